use std::path::{Path, PathBuf};

use clap::ValueEnum;
use gm_core::{Image, Rgba8, rgba8_to_bytes};
use gm_mip::LevelSink;
use image::{ImageFormat, ImageReader, RgbaImage};
use log::info;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("opening input image {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("decoding input image {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("input image {} is empty ({width}x{height})", path.display())]
    Empty {
        path: PathBuf,
        width: usize,
        height: usize,
    },
    #[error("constructing rgba image from {}", path.display())]
    Layout {
        path: PathBuf,
        #[source]
        source: gm_core::Error,
    },
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("level {level} ({width}x{height}) does not fit an image buffer")]
    Buffer {
        level: usize,
        width: usize,
        height: usize,
    },
    #[error("writing mip level {level} to {}", path.display())]
    Write {
        level: usize,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Container formats levels can be written in. All of them keep alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Png,
    Bmp,
    Tga,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Bmp => "bmp",
            Self::Tga => "tga",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Bmp => ImageFormat::Bmp,
            Self::Tga => ImageFormat::Tga,
        }
    }
}

/// Decodes any format the `image` crate recognises into RGBA8.
pub fn load_rgba(path: &Path) -> Result<Image<Rgba8>, DecodeError> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|source| DecodeError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let rgba = reader
        .decode()
        .map_err(|source| DecodeError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgba8();

    let (w, h) = (rgba.width() as usize, rgba.height() as usize);
    if w == 0 || h == 0 {
        return Err(DecodeError::Empty {
            path: path.to_path_buf(),
            width: w,
            height: h,
        });
    }

    let pixels = rgba.pixels().map(|p| Rgba8::from(p.0)).collect();
    Image::from_vec(w, h, pixels).map_err(|source| DecodeError::Layout {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `img` to `path` in `format`.
pub fn save_rgba(
    path: &Path,
    level: usize,
    img: &Image<Rgba8>,
    format: OutputFormat,
) -> Result<(), PersistenceError> {
    let buffer = RgbaImage::from_raw(
        img.width() as u32,
        img.height() as u32,
        rgba8_to_bytes(img.data()),
    )
    .ok_or(PersistenceError::Buffer {
        level,
        width: img.width(),
        height: img.height(),
    })?;

    buffer
        .save_with_format(path, format.image_format())
        .map_err(|source| PersistenceError::Write {
            level,
            path: path.to_path_buf(),
            source,
        })
}

/// Persists level `n` as `<dir>/<stem>_<n>.<ext>`.
#[derive(Debug)]
pub struct FileLevelSink {
    dir: PathBuf,
    stem: String,
    format: OutputFormat,
    written: Vec<PathBuf>,
}

impl FileLevelSink {
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>, format: OutputFormat) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
            format,
            written: Vec::new(),
        }
    }

    pub fn level_path(&self, level: usize) -> PathBuf {
        self.dir
            .join(format!("{}_{level}.{}", self.stem, self.format.extension()))
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl LevelSink for FileLevelSink {
    type Error = PersistenceError;

    fn write_level(&mut self, level: usize, image: &Image<Rgba8>) -> Result<(), Self::Error> {
        let path = self.level_path(level);
        save_rgba(&path, level, image, self.format)?;
        info!(
            "creating {} width={} height={}",
            path.display(),
            image.width(),
            image.height()
        );
        self.written.push(path);
        Ok(())
    }
}
