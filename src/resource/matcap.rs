//! Matcap images: the procedural fallback and the background loader.

use crate::color::{self, hex};
use image::{Rgba, RgbaImage};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// Side length, in pixels, of the procedural matcap.
pub const FALLBACK_MATCAP_SIZE: u32 = 128;

/// Largest matcap download accepted, in bytes.
pub const MAX_MATCAP_DOWNLOAD: u64 = 16 * 1024 * 1024;

/// Where a matcap image comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatcapSource {
    /// An image file on disk.
    Path(PathBuf),
    /// An `http://` or `https://` URL.
    Url(String),
}

impl MatcapSource {
    /// Reads the image from wherever it lives. Blocks until done.
    pub fn load(&self) -> Result<RgbaImage, String> {
        match self {
            MatcapSource::Path(path) => load_matcap(path),
            MatcapSource::Url(url) => fetch_matcap(url),
        }
    }
}

impl fmt::Display for MatcapSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatcapSource::Path(path) => write!(f, "{}", path.display()),
            MatcapSource::Url(url) => f.write_str(url),
        }
    }
}

fn is_url(s: &str) -> bool {
    let lower = s.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl From<&str> for MatcapSource {
    fn from(s: &str) -> Self {
        if is_url(s) {
            MatcapSource::Url(s.trim().to_string())
        } else {
            MatcapSource::Path(PathBuf::from(s))
        }
    }
}

impl From<String> for MatcapSource {
    fn from(s: String) -> Self {
        MatcapSource::from(s.as_str())
    }
}

impl From<PathBuf> for MatcapSource {
    fn from(path: PathBuf) -> Self {
        match path.to_str() {
            Some(s) if is_url(s) => MatcapSource::from(s),
            _ => MatcapSource::Path(path),
        }
    }
}

impl From<&Path> for MatcapSource {
    fn from(path: &Path) -> Self {
        MatcapSource::from(path.to_path_buf())
    }
}

impl From<&PathBuf> for MatcapSource {
    fn from(path: &PathBuf) -> Self {
        MatcapSource::from(path.clone())
    }
}

/// Generates a gold matcap: a lit sphere seen head-on, with a warm key light from the
/// upper left and a soft rim.
///
/// Pixels are sRGB-encoded, like any matcap image read from disk.
pub fn fallback_matcap(size: u32) -> RgbaImage {
    let size = size.max(2);
    let gold = color::from_hex_srgb(hex::GOLD);
    let shadow = [gold.r * 0.35, gold.g * 0.25, gold.b * 0.15];
    let light = [-0.45f32, 0.55, 0.70];
    let light_len = (light[0] * light[0] + light[1] * light[1] + light[2] * light[2]).sqrt();

    RgbaImage::from_fn(size, size, |px, py| {
        let x = (px as f32 + 0.5) / size as f32 * 2.0 - 1.0;
        let y = 1.0 - (py as f32 + 0.5) / size as f32 * 2.0;
        let r2 = (x * x + y * y).min(1.0);
        let z = (1.0 - r2).sqrt();

        let ndotl = ((x * light[0] + y * light[1] + z * light[2]) / light_len).max(0.0);
        let highlight = ndotl.powf(24.0);
        let rim = (1.0 - z).powf(3.0) * 0.35;

        let mut rgb = [0u8; 3];
        for (i, out) in rgb.iter_mut().enumerate() {
            let base = [gold.r, gold.g, gold.b][i];
            let c = shadow[i] + (base - shadow[i]) * ndotl + highlight + rim * base;
            *out = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        }

        Rgba([rgb[0], rgb[1], rgb[2], 255])
    })
}

/// Reads and decodes a matcap image.
pub fn load_matcap(path: &Path) -> Result<RgbaImage, String> {
    let image = image::open(path)
        .map_err(|e| format!("unable to load matcap {}: {}", path.display(), e))?;

    if image.width() == 0 || image.height() == 0 {
        return Err(format!("matcap {} is empty", path.display()));
    }

    Ok(image.to_rgba8())
}

/// Downloads and decodes a matcap image.
///
/// Bodies larger than [`MAX_MATCAP_DOWNLOAD`] are rejected.
pub fn fetch_matcap(url: &str) -> Result<RgbaImage, String> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| format!("unable to download matcap {url}: {e}"))?;

    let mut data = Vec::new();
    response
        .into_reader()
        .take(MAX_MATCAP_DOWNLOAD + 1)
        .read_to_end(&mut data)
        .map_err(|e| format!("unable to read matcap {url}: {e}"))?;

    if data.len() as u64 > MAX_MATCAP_DOWNLOAD {
        return Err(format!("matcap {url} is larger than {MAX_MATCAP_DOWNLOAD} bytes"));
    }

    let image = image::load_from_memory(&data)
        .map_err(|e| format!("unable to decode matcap {url}: {e}"))?;

    if image.width() == 0 || image.height() == 0 {
        return Err(format!("matcap {url} is empty"));
    }

    Ok(image.to_rgba8())
}

/// Reads or downloads a matcap image on a background thread.
///
/// The result is picked up by polling once per frame; it is delivered exactly once.
pub struct MatcapLoader {
    source: MatcapSource,
    receiver: Option<Receiver<Result<RgbaImage, String>>>,
}

impl MatcapLoader {
    /// Starts loading the image from `source`: a file path, or an http(s) URL.
    pub fn spawn(source: impl Into<MatcapSource>) -> MatcapLoader {
        let source = source.into();
        let (sender, receiver) = mpsc::channel();
        let thread_source = source.clone();

        log::debug!("Loading matcap from {}", source);

        let spawned = thread::Builder::new()
            .name("matcap-loader".to_string())
            .spawn(move || {
                // The receiver may be gone if the window was closed in the meantime.
                let _ = sender.send(thread_source.load());
            });

        let receiver = match spawned {
            Ok(_) => Some(receiver),
            Err(e) => {
                log::warn!("Unable to start the matcap loader: {}", e);
                None
            }
        };

        MatcapLoader { source, receiver }
    }

    /// Where the image is loaded from.
    pub fn source(&self) -> &MatcapSource {
        &self.source
    }

    /// Whether a result may still arrive.
    pub fn is_pending(&self) -> bool {
        self.receiver.is_some()
    }

    /// Returns the decoded image once it is ready.
    ///
    /// Returns `None` while decoding is still in progress, after a failure (which is logged),
    /// and on every call after the result has been delivered.
    pub fn poll(&mut self) -> Option<RgbaImage> {
        let result = match self.receiver.as_ref()?.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(format!(
                "the loader of {} stopped without a result",
                self.source
            )),
        };

        self.receiver = None;

        match result {
            Ok(image) => {
                log::info!(
                    "Loaded matcap {} ({}x{})",
                    self.source,
                    image.width(),
                    image.height()
                );
                Some(image)
            }
            Err(e) => {
                log::warn!("{}; keeping the procedural matcap", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use std::net::TcpListener;
    use std::time::Duration;

    /// Serves `body` once over HTTP/1.1 on a local port and returns its URL.
    fn serve_once(status: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/matcap.png", listener.local_addr().unwrap());

        let _ = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let header = format!(
                "HTTP/1.1 {status}\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(&body);
            let _ = stream.flush();
        });

        url
    }

    fn png(size: u32) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        fallback_matcap(size)
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    fn wait_for(loader: &mut MatcapLoader) -> Option<RgbaImage> {
        for _ in 0..500 {
            if let Some(image) = loader.poll() {
                return Some(image);
            }
            if !loader.is_pending() {
                return None;
            }
            thread::sleep(Duration::from_millis(10));
        }
        None
    }

    #[test]
    fn fallback_is_brightest_toward_the_key_light() {
        let image = fallback_matcap(64);
        let upper_left = image.get_pixel(22, 18)[0];
        let lower_right = image.get_pixel(44, 46)[0];
        assert!(upper_left > lower_right);
        assert_eq!(image.dimensions(), (64, 64));
    }

    #[test]
    fn missing_file_is_reported() {
        let mut loader = MatcapLoader::spawn("/nonexistent/matcap.png");
        assert!(wait_for(&mut loader).is_none());
        assert!(!loader.is_pending());
        assert!(loader.poll().is_none());
    }

    #[test]
    fn image_is_delivered_once() {
        let path =
            std::env::temp_dir().join(format!("memphis3d-matcap-{}.png", std::process::id()));
        fallback_matcap(16).save(&path).unwrap();

        let mut loader = MatcapLoader::spawn(&path);
        let image = wait_for(&mut loader).expect("the matcap should load");
        assert_eq!(image.dimensions(), (16, 16));
        assert!(loader.poll().is_none());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn sources_are_told_apart_by_scheme() {
        assert_eq!(
            MatcapSource::from("https://example.com/gold.png"),
            MatcapSource::Url("https://example.com/gold.png".to_string())
        );
        assert_eq!(
            MatcapSource::from("HTTP://example.com/gold.png"),
            MatcapSource::Url("HTTP://example.com/gold.png".to_string())
        );
        assert_eq!(
            MatcapSource::from("assets/gold.png"),
            MatcapSource::Path(PathBuf::from("assets/gold.png"))
        );
        assert_eq!(
            MatcapSource::from(PathBuf::from("/tmp/http.png")),
            MatcapSource::Path(PathBuf::from("/tmp/http.png"))
        );
    }

    #[test]
    fn image_is_downloaded_once() {
        let url = serve_once("200 OK", png(16));

        let mut loader = MatcapLoader::spawn(url.as_str());
        assert_eq!(loader.source(), &MatcapSource::Url(url));
        let image = wait_for(&mut loader).expect("the matcap should download");
        assert_eq!(image.dimensions(), (16, 16));
        assert!(loader.poll().is_none());
    }

    #[test]
    fn http_errors_keep_the_fallback() {
        let url = serve_once("404 Not Found", b"missing".to_vec());

        let mut loader = MatcapLoader::spawn(url.as_str());
        assert!(wait_for(&mut loader).is_none());
        assert!(!loader.is_pending());
    }

    #[test]
    fn undecodable_downloads_are_reported() {
        let url = serve_once("200 OK", b"not an image".to_vec());

        let err = fetch_matcap(&url).unwrap_err();
        assert!(err.contains("decode"), "{err}");
    }
}
