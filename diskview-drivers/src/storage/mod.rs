//! Removable storage: SD slot transport and FAT filesystem

pub mod card_detect;
pub mod sdmmc;

pub use card_detect::{CardDetectTransport, SlotPhase};
pub use sdmmc::{FixedTime, Removable, SdFile, SdFilesystem};
