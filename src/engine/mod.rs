pub mod command;
pub mod dice;
pub mod fog;
pub mod initiative;
pub mod map_image;
pub mod roller;
pub mod storage;
pub mod store;
