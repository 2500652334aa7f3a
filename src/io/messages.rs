//! Message types for sketch file operations.

use bevy::prelude::*;
use std::path::PathBuf;

#[derive(Message)]
pub struct SaveSketchRequest {
    pub path: PathBuf,
}

#[derive(Message)]
pub struct LoadSketchRequest {
    pub path: PathBuf,
}

#[derive(Message)]
pub struct NewSketchRequest;
