//! Media decoding: thumbnails and the enlarged display rendering

use crate::AppError;
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, GenericImageView, ImageFormat, ImageReader, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, oneshot};

/// Decoded RGBA8 raster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixels {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Pixels {
    fn from_image(img: DynamicImage) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            data: rgba.into_raw(),
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// One frame of an animation
#[derive(Debug, Clone)]
pub struct AnimationFrame {
    pub pixels: Pixels,
    pub delay_ms: u32,
}

/// Display-ready media
#[derive(Debug, Clone)]
pub enum Media {
    Still(Pixels),
    Animated(Vec<AnimationFrame>),
}

impl Media {
    pub fn is_animated(&self) -> bool {
        matches!(self, Media::Animated(_))
    }

    /// The still image, or the first frame of an animation
    pub fn first_frame(&self) -> Option<&Pixels> {
        match self {
            Media::Still(pixels) => Some(pixels),
            Media::Animated(frames) => frames.first().map(|f| &f.pixels),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.first_frame().map(|p| (p.width, p.height)).unwrap_or((0, 0))
    }

    pub fn frame_count(&self) -> usize {
        match self {
            Media::Still(_) => 1,
            Media::Animated(frames) => frames.len(),
        }
    }
}

/// Options for the enlarged rendering
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    pub max_size: Option<(u32, u32)>,
    pub animate: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_size: None,
            animate: true,
        }
    }
}

fn fit(img: DynamicImage, max_size: Option<(u32, u32)>) -> DynamicImage {
    match max_size {
        Some((max_w, max_h)) => {
            let (w, h) = img.dimensions();
            if w > max_w || h > max_h {
                img.thumbnail(max_w, max_h)
            } else {
                img
            }
        }
        None => img,
    }
}

fn read_source(path: &Path) -> Result<(Vec<u8>, ImageFormat), AppError> {
    let display = path.display().to_string();
    let data = std::fs::read(path).map_err(|e| AppError::decode(&display, e))?;
    let format = image::guess_format(&data).map_err(|e| AppError::decode(&display, e))?;
    Ok((data, format))
}

/// Decode a file for display.
///
/// Multi-frame GIFs become [`Media::Animated`]; everything else, including
/// single-frame GIFs, becomes [`Media::Still`].
pub fn decode_media(path: &Path, options: DecodeOptions) -> Result<Media, AppError> {
    tracing::debug!("Decoding media: {:?}", path);
    let display = path.display().to_string();
    let (data, format) = read_source(path)?;

    if format == ImageFormat::Gif && options.animate {
        let decoder = GifDecoder::new(Cursor::new(&data)).map_err(|e| AppError::decode(&display, e))?;
        let frames = decoder
            .into_frames()
            .collect_frames()
            .map_err(|e| AppError::decode(&display, e))?;

        if frames.len() > 1 {
            let frames = frames
                .into_iter()
                .map(|frame| {
                    let (numer, denom) = frame.delay().numer_denom_ms();
                    let delay_ms = if denom == 0 { 0 } else { numer / denom };
                    let img = fit(DynamicImage::ImageRgba8(frame.into_buffer()), options.max_size);
                    AnimationFrame {
                        pixels: Pixels::from_image(img),
                        delay_ms,
                    }
                })
                .collect();
            return Ok(Media::Animated(frames));
        }
    }

    let img = ImageReader::with_format(Cursor::new(&data), format)
        .decode()
        .map_err(|e| AppError::decode(&display, e))?;

    Ok(Media::Still(Pixels::from_image(fit(img, options.max_size))))
}

/// Thumbnail generator
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailGenerator {
    size: u32,
}

impl ThumbnailGenerator {
    pub fn new(size: u32) -> Self {
        Self { size: size.max(1) }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Generate a thumbnail for an image file (first frame for animations)
    pub fn generate(&self, path: &Path) -> Result<Pixels, AppError> {
        let (data, format) = read_source(path)?;

        let img = ImageReader::with_format(Cursor::new(&data), format)
            .decode()
            .map_err(|e| AppError::decode(path.display().to_string(), e))?;

        Ok(Pixels::from_image(img.thumbnail(self.size, self.size)))
    }

    /// Neutral grey square shown for files that cannot be decoded
    pub fn placeholder(&self) -> Pixels {
        let img = RgbaImage::from_pixel(self.size, self.size, Rgba([64, 64, 64, 255]));
        Pixels::from_image(DynamicImage::ImageRgba8(img))
    }
}

/// Load request
#[derive(Debug)]
struct LoadRequest {
    path: PathBuf,
    options: DecodeOptions,
    callback: oneshot::Sender<Result<Media, AppError>>,
}

/// Decodes display media on a dedicated worker thread
pub struct MediaLoader {
    request_tx: mpsc::UnboundedSender<LoadRequest>,
}

impl MediaLoader {
    pub fn new() -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<LoadRequest>();

        std::thread::spawn(move || {
            while let Some(request) = request_rx.blocking_recv() {
                let result = decode_media(&request.path, request.options);
                let _ = request.callback.send(result);
            }
        });

        Self { request_tx }
    }

    /// Decode `path` off the calling context
    pub async fn load(&self, path: PathBuf, options: DecodeOptions) -> Result<Media, AppError> {
        let (tx, rx) = oneshot::channel();

        self.request_tx
            .send(LoadRequest {
                path,
                options,
                callback: tx,
            })
            .map_err(|_| AppError::SystemResource("Media loader channel closed".into()))?;

        rx.await
            .map_err(|_| AppError::SystemResource("Media loader response failed".into()))?
    }
}

impl Default for MediaLoader {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_still_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "a.png", 40, 20);

        let media = decode_media(&path, DecodeOptions::default()).unwrap();
        assert!(!media.is_animated());
        assert_eq!(media.dimensions(), (40, 20));
        assert_eq!(media.first_frame().unwrap().aspect_ratio(), 2.0);
    }

    #[test]
    fn test_display_downscale() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "a.png", 40, 20);

        let options = DecodeOptions { max_size: Some((10, 10)), animate: true };
        let media = decode_media(&path, options).unwrap();
        assert_eq!(media.dimensions(), (10, 5));
    }

    #[test]
    fn test_animated_gif() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_gif(dir.path(), "a.gif", 3);

        let media = decode_media(&path, DecodeOptions::default()).unwrap();
        assert!(media.is_animated());
        assert_eq!(media.frame_count(), 3);
        match media {
            Media::Animated(frames) => assert_eq!(frames[0].delay_ms, 100),
            Media::Still(_) => unreachable!(),
        }
    }

    #[test]
    fn test_single_frame_gif_is_still() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_gif(dir.path(), "one.gif", 1);

        let media = decode_media(&path, DecodeOptions::default()).unwrap();
        assert!(!media.is_animated());
    }

    #[test]
    fn test_animation_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_gif(dir.path(), "a.gif", 3);

        let options = DecodeOptions { max_size: None, animate: false };
        assert!(!decode_media(&path, options).unwrap().is_animated());
    }

    #[test]
    fn test_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_garbage(dir.path(), "bad.png");

        let err = decode_media(&path, DecodeOptions::default()).unwrap_err();
        assert!(matches!(err, AppError::DecodeFailure { .. }));

        let missing = dir.path().join("missing.png");
        assert!(ThumbnailGenerator::new(16).generate(&missing).is_err());
    }

    #[test]
    fn test_thumbnail_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "wide.png", 64, 16);

        let thumb = ThumbnailGenerator::new(32).generate(&path).unwrap();
        assert_eq!((thumb.width, thumb.height), (32, 8));
        assert_eq!(thumb.data.len(), 32 * 8 * 4);
    }

    #[test]
    fn test_placeholder() {
        let placeholder = ThumbnailGenerator::new(16).placeholder();
        assert_eq!((placeholder.width, placeholder.height), (16, 16));
    }

    #[tokio::test]
    async fn test_loader_off_thread() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_gif(dir.path(), "a.gif", 2);
        let bad = write_garbage(dir.path(), "b.gif");

        let loader = MediaLoader::new();
        assert!(loader.load(good, DecodeOptions::default()).await.unwrap().is_animated());
        assert!(loader.load(bad, DecodeOptions::default()).await.is_err());
    }
}
