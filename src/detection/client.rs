//! Wire types and the blocking HTTP call to the roof-detection service.
//!
//! The service takes the visible geographic box and returns candidate roof
//! segments as lng/lat pairs with an optional edge classification each.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::viewport::ViewportBounds;

use super::state::DetectionOutcome;

#[derive(Debug, Clone, Serialize)]
pub struct DetectionQuery {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
    pub zoom: f64,
}

impl DetectionQuery {
    pub fn new(bounds: ViewportBounds, zoom: f64) -> Self {
        Self {
            west: bounds.west,
            south: bounds.south,
            east: bounds.east,
            north: bounds.north,
            zoom,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectionResponse {
    #[serde(default)]
    pub edges: Vec<DetectedEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectedEdge {
    /// [lng, lat]
    pub start: [f64; 2],
    /// [lng, lat]
    pub end: [f64; 2],
    #[serde(default)]
    pub label: Option<String>,
}

impl DetectedEdge {
    pub fn start_point(&self) -> GeoPoint {
        GeoPoint::new(self.start[0], self.start[1])
    }

    pub fn end_point(&self) -> GeoPoint {
        GeoPoint::new(self.end[0], self.end[1])
    }
}

/// Posts the query and parses the response. Runs on the compute pool; never
/// call from a system directly.
pub fn fetch_detection(endpoint: String, query: DetectionQuery) -> DetectionOutcome {
    let response = ureq::post(&endpoint)
        .set("User-Agent", "rooftrace-detection")
        .send_json(&query);

    match response {
        Ok(resp) => match resp.into_json::<DetectionResponse>() {
            Ok(parsed) => DetectionOutcome {
                edges: parsed.edges,
                error: None,
            },
            Err(e) => DetectionOutcome {
                edges: Vec::new(),
                error: Some(format!("Failed to parse detection response: {}", e)),
            },
        },
        Err(ureq::Error::Status(code, _)) => DetectionOutcome {
            edges: Vec::new(),
            error: Some(format!("Detection service returned HTTP {}", code)),
        },
        Err(e) => DetectionOutcome {
            edges: Vec::new(),
            error: Some(format!("Detection request failed: {}", e)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parses_with_labels_optional() {
        let json = r#"{
            "edges": [
                {"start": [-91.53, 41.66], "end": [-91.5299, 41.66], "label": "eave"},
                {"start": [-91.5299, 41.66], "end": [-91.5299, 41.6601]}
            ]
        }"#;
        let parsed: DetectionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.edges.len(), 2);
        assert_eq!(parsed.edges[0].label.as_deref(), Some("eave"));
        assert!(parsed.edges[1].label.is_none());
        assert!((parsed.edges[0].start_point().lng - -91.53).abs() < 1e-12);
    }

    #[test]
    fn test_empty_response_parses() {
        let parsed: DetectionResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.edges.is_empty());
    }

    #[test]
    fn test_query_serializes_bounds() {
        let query = DetectionQuery {
            west: -91.54,
            south: 41.65,
            east: -91.52,
            north: 41.67,
            zoom: 19.0,
        };
        let json = serde_json::to_string(&query).unwrap();
        assert!(json.contains("\"west\":-91.54"));
        assert!(json.contains("\"zoom\":19.0"));
    }
}
