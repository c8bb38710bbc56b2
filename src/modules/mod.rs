pub mod carousel;
pub mod catalog;
pub mod gesture;
pub mod playback;
pub mod storage;
