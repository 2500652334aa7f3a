//! Annotation stores layered over the sketch: facet label codes, pitch
//! assignments, and point-of-interest pins. Facet-keyed stores survive
//! re-detection because they key off the fingerprint rather than the facet's
//! position in the detection output.

pub mod labels;
pub mod pins;
pub mod pitch;

pub use labels::{FacetLabels, LABEL_DORMER, LABEL_LOW_SLOPE, LABEL_REMOVED, RESERVED_CODES};
pub use pins::{Pin, PinCategory, Pins};
pub use pitch::{FacetPitches, Pitch};

use bevy::prelude::*;

pub struct AnnotationPlugin;

impl Plugin for AnnotationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FacetLabels>()
            .init_resource::<FacetPitches>()
            .init_resource::<Pins>();
    }
}
