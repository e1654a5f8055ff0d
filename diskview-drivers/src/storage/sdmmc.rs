//! FAT filesystem on an SD card
//!
//! Implements the [`Filesystem`] contract over `embedded-sdmmc`'s raw
//! handle API. One volume can be mounted at a time; an open file keeps
//! its root directory handle so both are released together on close.

use core::fmt::Debug;

use diskview_hal::{Filesystem, FsError, OpenMode};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use embedded_sdmmc::{
    BlockDevice, Error, Mode, RawDirectory, RawFile, RawVolume, SdCard, TimeSource, Timestamp,
    VolumeIdx, VolumeManager,
};

/// Block device that can be pulled out and replaced
pub trait Removable {
    /// Drop any cached card state so the next access re-initializes
    fn forget(&self);
}

impl<SPI, CS, DELAYER> Removable for SdCard<SPI, CS, DELAYER>
where
    SPI: SpiDevice<u8>,
    CS: OutputPin,
    DELAYER: DelayNs,
{
    fn forget(&self) {
        self.mark_card_uninit();
    }
}

/// Time source for a board without a calendar clock
///
/// Only used for directory entries the firmware never writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedTime;

impl TimeSource for FixedTime {
    fn get_timestamp(&self) -> Timestamp {
        // 2024-01-01 00:00:00
        Timestamp {
            year_since_1970: 54,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

/// Open file on the SD card
#[derive(Debug)]
pub struct SdFile {
    file: RawFile,
    dir: RawDirectory,
}

/// FAT filesystem layer over a removable block device
pub struct SdFilesystem<D, T>
where
    D: BlockDevice,
    T: TimeSource,
    D::Error: Debug,
{
    volumes: VolumeManager<D, T>,
    mounted: Option<RawVolume>,
}

impl<D, T> SdFilesystem<D, T>
where
    D: BlockDevice + Removable,
    T: TimeSource,
    D::Error: Debug,
{
    pub fn new(device: D, time: T) -> Self {
        Self {
            volumes: VolumeManager::new(device, time),
            mounted: None,
        }
    }
}

impl<D, T> Filesystem for SdFilesystem<D, T>
where
    D: BlockDevice + Removable,
    T: TimeSource,
    D::Error: Debug,
{
    type File = SdFile;

    fn mount(&mut self, volume: &str) -> Result<(), FsError> {
        let idx = parse_volume(volume)?;
        if self.mounted.is_some() {
            return Ok(());
        }

        // The card may have been swapped since the last access
        self.volumes.device().forget();
        let raw = self
            .volumes
            .open_raw_volume(VolumeIdx(idx))
            .map_err(map_error)?;
        self.mounted = Some(raw);
        Ok(())
    }

    fn open(&mut self, path: &str, mode: OpenMode) -> Result<SdFile, FsError> {
        let volume = self.mounted.ok_or(FsError::NotMounted)?;
        let dir = self.volumes.open_root_dir(volume).map_err(map_error)?;

        let mode = match mode {
            OpenMode::ReadOnly => Mode::ReadOnly,
        };
        match self
            .volumes
            .open_file_in_dir(dir, path.trim_start_matches('/'), mode)
        {
            Ok(file) => Ok(SdFile { file, dir }),
            Err(e) => {
                let _ = self.volumes.close_dir(dir);
                Err(map_error(e))
            }
        }
    }

    fn read(&mut self, file: &mut SdFile, buf: &mut [u8]) -> Result<usize, FsError> {
        match self.volumes.read(file.file, buf) {
            Ok(n) => Ok(n),
            Err(Error::EndOfFile) => Ok(0),
            Err(e) => Err(map_error(e)),
        }
    }

    fn close(&mut self, file: SdFile) -> Result<(), FsError> {
        let closed = self.volumes.close_file(file.file).map_err(map_error);
        let dir = self.volumes.close_dir(file.dir).map_err(map_error);
        closed.and(dir)
    }

    fn unmount(&mut self, _volume: &str) -> Result<(), FsError> {
        let Some(raw) = self.mounted.take() else {
            return Ok(());
        };
        let result = self.volumes.close_volume(raw).map_err(map_error);
        self.volumes.device().forget();
        result
    }
}

/// Parse a logical volume id like `"0:/"`, `"1:"` or `"0"`
fn parse_volume(volume: &str) -> Result<usize, FsError> {
    let index = match volume.split_once(':') {
        Some((index, rest)) if rest.is_empty() || rest == "/" => index,
        Some(_) => return Err(FsError::InvalidVolume),
        None => volume,
    };
    index.parse().map_err(|_| FsError::InvalidVolume)
}

fn map_error<E: Debug>(e: Error<E>) -> FsError {
    match e {
        Error::DeviceError(_) => FsError::Disk,
        Error::FormatError(_) => FsError::NoFilesystem,
        Error::NoSuchVolume => FsError::InvalidVolume,
        Error::FilenameError(_) => FsError::InvalidName,
        Error::NotFound => FsError::NotFound,
        Error::TooManyOpenVolumes | Error::TooManyOpenDirs | Error::TooManyOpenFiles => {
            FsError::TooManyOpen
        }
        Error::ReadOnly | Error::FileAlreadyOpen => FsError::Denied,
        _ => FsError::Disk,
    }
}
