pub mod backdrop_segmenter;
pub mod mask_refiner;
