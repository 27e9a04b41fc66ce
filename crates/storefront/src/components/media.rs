//! Product media mapping.

use serde::Serialize;

use crate::wix::{ImageRef, MediaItem, MediaType, Product, Variant};

const WIX_IMAGE_PREFIX: &str = "wix:image://v1/";
const STATIC_MEDIA_BASE: &str = "https://static.wixstatic.com/media/";

/// Kind of a gallery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// One renderable media entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaViewState {
    pub url: String,
    pub alt: String,
    pub kind: MediaKind,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl MediaViewState {
    #[must_use]
    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }
}

/// Convert a `wix:image://v1/<id>/<name>#...` URI into a static media URL.
///
/// Anything that is not a Wix image URI is returned unchanged.
#[must_use]
pub fn media_url(uri: &str) -> String {
    uri.strip_prefix(WIX_IMAGE_PREFIX).map_or_else(
        || uri.to_string(),
        |rest| {
            let id = rest
                .split(['/', '#'])
                .next()
                .unwrap_or(rest);
            format!("{STATIC_MEDIA_BASE}{id}")
        },
    )
}

/// Media view of an image reference.
#[must_use]
pub fn image_view(image: &ImageRef, fallback_alt: &str) -> Option<MediaViewState> {
    let url = image.url().filter(|u| !u.is_empty())?;
    let (width, height) = image.dimensions();
    Some(MediaViewState {
        url: media_url(url),
        alt: image
            .alt_text()
            .filter(|a| !a.is_empty())
            .unwrap_or(fallback_alt)
            .to_string(),
        kind: MediaKind::Image,
        width,
        height,
    })
}

/// Media view of a gallery item.
#[must_use]
pub fn media_item_view(item: &MediaItem, fallback_alt: &str) -> Option<MediaViewState> {
    let is_video = item.media_type == Some(MediaType::Video) || item.video.is_some();
    let source = if is_video {
        item.video.as_ref()
    } else {
        item.image.as_ref()
    };

    let mut view = match (item.url.as_deref().filter(|u| !u.is_empty()), source) {
        (Some(url), source) => {
            let (width, height) = source.map_or((None, None), ImageRef::dimensions);
            MediaViewState {
                url: media_url(url),
                alt: String::new(),
                kind: MediaKind::Image,
                width,
                height,
            }
        }
        (None, Some(source)) => image_view(source, fallback_alt)?,
        (None, None) => return None,
    };

    view.alt = item
        .alt_text
        .as_deref()
        .or_else(|| source.and_then(ImageRef::alt_text))
        .filter(|a| !a.is_empty())
        .unwrap_or(fallback_alt)
        .to_string();
    if is_video {
        view.kind = MediaKind::Video;
    }
    Some(view)
}

fn product_name(product: &Product) -> &str {
    product.name.as_deref().unwrap_or_default()
}

/// Main media of a product.
#[must_use]
pub fn main_media(product: &Product) -> Option<MediaViewState> {
    let media = product.media.as_ref()?;
    let alt = product_name(product);
    media
        .main
        .as_ref()
        .and_then(|m| media_item_view(m, alt))
        .or_else(|| {
            media
                .items_info
                .as_ref()
                .and_then(|info| info.items.iter().find_map(|m| media_item_view(m, alt)))
        })
}

/// Full gallery: the main media first, then every other item once.
#[must_use]
pub fn product_gallery(product: &Product) -> Vec<MediaViewState> {
    let alt = product_name(product);
    let mut gallery: Vec<MediaViewState> = main_media(product).into_iter().collect();

    let items = product
        .media
        .as_ref()
        .and_then(|m| m.items_info.as_ref())
        .map_or(&[][..], |info| info.items.as_slice());

    for view in items.iter().filter_map(|m| media_item_view(m, alt)) {
        if !gallery.iter().any(|g| g.url == view.url) {
            gallery.push(view);
        }
    }
    gallery
}

/// Gallery with the variant's own media moved to the front, when it has one.
#[must_use]
pub fn gallery_for_variant(product: &Product, variant: Option<&Variant>) -> Vec<MediaViewState> {
    let mut gallery = product_gallery(product);
    let Some(view) = variant
        .and_then(|v| v.media.as_ref())
        .and_then(|m| media_item_view(m, product_name(product)))
    else {
        return gallery;
    };
    gallery.retain(|g| g.url != view.url);
    gallery.insert(0, view);
    gallery
}
