mod gaussian;
pub mod hsv;
pub mod hsv_color_key_segmenter;
pub mod morphological_mask_refiner;
pub mod morphology;
