//! Pure thumbnail rules.
//!
//! Each `plan_*` function looks at the bitstreams of one item and returns
//! what should happen to them. Nothing here touches the repository.

use std::collections::HashSet;

use curation_core::{Bitstream, BundleRole, Handle};

/// Description DSpace gives thumbnails rendered by ImageMagick from PDFs.
pub const IM_THUMBNAIL: &str = "IM Thumbnail";

/// Description DSpace gives thumbnails generated from images.
pub const GENERATED_THUMBNAIL: &str = "Generated Thumbnail";

const PDF_MIME: &str = "application/pdf";
const JPEG_MIME: &str = "image/jpeg";

/// What to do with one bitstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailDecision {
    /// Remove the bitstream from `role`.
    Remove { role: BundleRole, bitstream: Bitstream },
    /// The bitstream was looked at and stays where it is.
    Keep { role: BundleRole, bitstream: Bitstream },
    /// Promote `original` into the thumbnail role, then remove it from the
    /// original role and remove `thumbnail` from the thumbnail role.
    Swap {
        original: Bitstream,
        thumbnail: Bitstream,
    },
}

impl ThumbnailDecision {
    /// Whether applying this decision changes the item.
    pub fn is_action(&self) -> bool {
        !matches!(self, ThumbnailDecision::Keep { .. })
    }

    /// The bitstream the decision is about. For a swap, the replaced thumbnail.
    pub fn bitstream(&self) -> &Bitstream {
        match self {
            ThumbnailDecision::Remove { bitstream, .. } => bitstream,
            ThumbnailDecision::Keep { bitstream, .. } => bitstream,
            ThumbnailDecision::Swap { thumbnail, .. } => thumbnail,
        }
    }

    /// Report line for this decision.
    pub fn describe(&self, handle: &Handle) -> String {
        match self {
            ThumbnailDecision::Remove { role, bitstream } => format!(
                "{}: removing {:?} ({}) from {}",
                handle,
                bitstream.name,
                bitstream.description().unwrap_or("no description"),
                role
            ),
            ThumbnailDecision::Keep { role, bitstream } => format!(
                "{}: keeping {:?} ({}) in {}",
                handle,
                bitstream.name,
                bitstream.description().unwrap_or("no description"),
                role
            ),
            ThumbnailDecision::Swap {
                original,
                thumbnail,
            } => format!(
                "{}: replacing {} ({}) with {}",
                handle,
                thumbnail.name,
                thumbnail.description().unwrap_or("no description"),
                original.name
            ),
        }
    }
}

/// Thumbnail-role cleanup.
///
/// Only applies when one of the thumbnails is an `IM Thumbnail`. Then every
/// other described thumbnail that is a `Generated Thumbnail`, or whose
/// description mentions "thumbnail" in any case, is removed. Thumbnails without
/// a description are left out of the plan entirely.
pub fn plan_thumbnail_cleanup(thumbnails: &[Bitstream]) -> Vec<ThumbnailDecision> {
    let has_im_thumbnail = thumbnails
        .iter()
        .any(|bitstream| bitstream.description() == Some(IM_THUMBNAIL));
    if !has_im_thumbnail {
        return Vec::new();
    }

    thumbnails
        .iter()
        .filter_map(|bitstream| {
            let description = bitstream.description()?;
            let remove = description == GENERATED_THUMBNAIL
                || (description != IM_THUMBNAIL && mentions_thumbnail(description));
            let role = BundleRole::Thumbnail;
            let bitstream = bitstream.clone();
            Some(if remove {
                ThumbnailDecision::Remove { role, bitstream }
            } else {
                ThumbnailDecision::Keep { role, bitstream }
            })
        })
        .collect()
}

/// Original-role cleanup.
///
/// Only applies when the originals include both a PDF and a JPEG. Then every
/// described JPEG whose name or description mentions "thumbnail" is removed.
pub fn plan_original_cleanup(originals: &[Bitstream]) -> Vec<ThumbnailDecision> {
    let has_pdf = originals.iter().any(|b| has_mime(b, PDF_MIME));
    let has_jpeg = originals.iter().any(|b| has_mime(b, JPEG_MIME));
    if !(has_pdf && has_jpeg) {
        return Vec::new();
    }

    originals
        .iter()
        .filter_map(|bitstream| {
            let description = bitstream.description()?;
            let remove = has_mime(bitstream, JPEG_MIME)
                && (mentions_thumbnail(&bitstream.name) || mentions_thumbnail(description));
            let role = BundleRole::Original;
            let bitstream = bitstream.clone();
            Some(if remove {
                ThumbnailDecision::Remove { role, bitstream }
            } else {
                ThumbnailDecision::Keep { role, bitstream }
            })
        })
        .collect()
}

/// Legacy `.jpg.jpg` swap.
///
/// A thumbnail named `<original>.jpg` (any case) with a generated description
/// is replaced by its original when the original is smaller than
/// `size_threshold` bytes. Each thumbnail and each original takes part in at
/// most one swap.
pub fn plan_jpg_jpg_swap(
    originals: &[Bitstream],
    thumbnails: &[Bitstream],
    size_threshold: u64,
) -> Vec<ThumbnailDecision> {
    let mut promoted: HashSet<&str> = HashSet::new();
    let mut decisions = Vec::new();

    for thumbnail in thumbnails {
        let Some(description) = thumbnail.description() else {
            continue;
        };
        if description != GENERATED_THUMBNAIL && description != IM_THUMBNAIL {
            continue;
        }
        if !thumbnail.name.to_lowercase().contains(".jpg.jpg") {
            continue;
        }
        let Some(stem) = strip_jpg_suffix(&thumbnail.name) else {
            continue;
        };

        let original = originals.iter().find(|original| {
            !promoted.contains(original.id.as_str())
                && original.name.to_lowercase() == stem.to_lowercase()
                && original.size_bytes < size_threshold
        });

        if let Some(original) = original {
            promoted.insert(original.id.as_str());
            decisions.push(ThumbnailDecision::Swap {
                original: original.clone(),
                thumbnail: thumbnail.clone(),
            });
        }
    }

    decisions
}

/// The first of `types` that is in `exempt`, if any.
pub fn exempt_type<'a>(types: &'a [String], exempt: &[String]) -> Option<&'a str> {
    types
        .iter()
        .find(|value| exempt.iter().any(|e| e == *value))
        .map(String::as_str)
}

fn mentions_thumbnail(text: &str) -> bool {
    text.to_lowercase().contains("thumbnail")
}

fn has_mime(bitstream: &Bitstream, mime: &str) -> bool {
    bitstream.mime_type.to_lowercase().contains(mime)
}

/// `name` without one trailing `.jpg`, compared case-insensitively.
fn strip_jpg_suffix(name: &str) -> Option<&str> {
    let split = name.len().checked_sub(4)?;
    let suffix = name.get(split..)?;
    if suffix.eq_ignore_ascii_case(".jpg") {
        name.get(..split)
    } else {
        None
    }
}
