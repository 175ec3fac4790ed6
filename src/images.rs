use std::{fmt::Write, time::Duration};

use reqwest::{Client, StatusCode, Url, redirect};
use serde::Serialize;

use crate::types::{ImageRef, ImageStatus};

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_PROBE_DELAY: Duration = Duration::from_millis(100);

const URL_PREVIEW_LEN: usize = 80;
const ERROR_PREVIEW_LEN: usize = 50;
const RULE_WIDTH: usize = 60;

/// Reads an image list. Each line is either a bare URL or `property_id,image_id,url`.
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_image_list(text: &str) -> Result<Vec<ImageRef>, anyhow::Error> {
    let mut images = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let image = match parse_row(line) {
            Some(image) => image,
            None => ImageRef {
                property_id: None,
                image_id: None,
                url: line.to_string(),
            },
        };

        if let Err(e) = Url::parse(&image.url) {
            return Err(anyhow::anyhow!(
                "line {}: invalid URL {:?}: {e}",
                idx + 1,
                image.url
            ));
        }

        images.push(image);
    }

    Ok(images)
}

/// `PROPERTY_ID,IMAGE_ID,URL`, recognised only when both ids are integers.
/// The URL keeps any commas of its own.
fn parse_row(line: &str) -> Option<ImageRef> {
    let mut fields = line.splitn(3, ',').map(str::trim);
    let property_id = fields.next()?.parse().ok()?;
    let image_id = fields.next()?.parse().ok()?;
    let url = fields.next()?;

    Some(ImageRef {
        property_id: Some(property_id),
        image_id: Some(image_id),
        url: url.to_string(),
    })
}

#[derive(Serialize, Debug, Default)]
pub struct CheckReport {
    pub results: Vec<(ImageRef, ImageStatus)>,
}

impl CheckReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn broken(&self) -> impl Iterator<Item = &(ImageRef, ImageStatus)> {
        self.results.iter().filter(|(_, status)| status.is_broken())
    }

    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(RULE_WIDTH);

        let broken: Vec<_> = self
            .results
            .iter()
            .enumerate()
            .filter(|(_, (_, status))| status.is_broken())
            .collect();

        let _ = writeln!(out, "\n{rule}");
        let _ = writeln!(
            out,
            "Summary: {} broken images found out of {} total",
            broken.len(),
            self.total()
        );
        let _ = writeln!(out, "{rule}");

        if broken.is_empty() {
            let _ = writeln!(out, "\nAll images are working!");
        } else {
            let _ = writeln!(out, "\nBroken images:");
            for (idx, (image, _)) in broken {
                let _ = writeln!(out, "  - {}", label(idx, image));
            }
        }

        out
    }
}

/// The report entry for one image, `idx` being its position in the list.
pub fn render_line(idx: usize, image: &ImageRef, status: &ImageStatus) -> String {
    let mut out = String::new();
    let label = label(idx, image);

    let _ = match status {
        ImageStatus::Ok(code) => writeln!(out, "[OK] {label}: {code}"),
        ImageStatus::NotFound => writeln!(out, "[X] {label}: 404 NOT FOUND"),
        ImageStatus::HttpError(code) => writeln!(out, "[!] {label}: HTTP {code}"),
        ImageStatus::RequestFailed(msg) => writeln!(out, "[X] {label}: ERROR - {msg}"),
    };
    if status.is_broken() {
        let _ = writeln!(out, "    URL: {}...", preview(&image.url, URL_PREVIEW_LEN));
    }

    out
}

fn label(idx: usize, image: &ImageRef) -> String {
    match (image.property_id, image.image_id) {
        (Some(property_id), Some(image_id)) => {
            format!("Property {property_id}, Image ID {image_id}")
        }
        _ => format!("Image #{}", idx + 1),
    }
}

fn preview(text: &str, len: usize) -> String {
    text.chars().take(len).collect()
}

pub struct ImageChecker {
    client: Client,
    delay: Duration,
}

impl ImageChecker {
    pub fn new(timeout: Duration, delay: Duration) -> Result<ImageChecker, anyhow::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(10))
            .build()?;

        Ok(ImageChecker { client, delay })
    }

    pub async fn probe(&self, url: &str) -> ImageStatus {
        match self.client.head(url).send().await {
            Ok(resp) => classify(resp.status()),
            Err(e) => ImageStatus::RequestFailed(preview(&e.to_string(), ERROR_PREVIEW_LEN)),
        }
    }

    /// Probes every image in order. Individual failures end up in the report.
    /// `on_result` sees each outcome as soon as its probe finishes.
    pub async fn check_images(
        &self,
        images: Vec<ImageRef>,
        mut on_result: impl FnMut(usize, &ImageRef, &ImageStatus),
    ) -> CheckReport {
        let mut report = CheckReport::default();
        let count = images.len();

        for (idx, image) in images.into_iter().enumerate() {
            let status = self.probe(&image.url).await;
            if status.is_broken() {
                tracing::warn!(url = %image.url, ?status, "broken image");
            } else {
                tracing::debug!(url = %image.url, ?status, "image ok");
            }
            on_result(idx, &image, &status);
            report.results.push((image, status));

            if idx + 1 < count && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        report
    }
}

fn classify(status: StatusCode) -> ImageStatus {
    if status == StatusCode::NOT_FOUND {
        ImageStatus::NotFound
    } else if status.as_u16() >= 400 {
        ImageStatus::HttpError(status.as_u16())
    } else {
        ImageStatus::Ok(status.as_u16())
    }
}
