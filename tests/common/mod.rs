#![allow(dead_code)]

pub mod spot_classifier;
pub mod synthetic_image;
