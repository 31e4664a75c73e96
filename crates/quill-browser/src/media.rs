//! Synthetic drag-and-drop payloads
//!
//! The composer's media control only accepts dropped files. The script
//! built here reconstructs a `File` from base64 in page context and fires
//! the dragover/drop pair at the control, which is how a headless session
//! uploads a thumbnail without a real pointer.

use base64::Engine;
use quill_core::{QuillError, Result};
use std::path::Path;

/// Read an image file and build the drop script for `drop_selector`.
///
/// The script evaluates to `true` once the drop events have been
/// dispatched, `false` if the drop target is missing.
pub fn drop_script_for_file(drop_selector: &str, path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| QuillError::Validation(format!("bad thumbnail path: {}", path.display())))?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(drop_script(drop_selector, file_name, &encoded))
}

/// Build the drop script from an already-encoded payload
pub fn drop_script(drop_selector: &str, file_name: &str, base64_data: &str) -> String {
    let selector = serde_json::to_string(drop_selector).expect("string serializes");
    let name = serde_json::to_string(file_name).expect("string serializes");
    let data = serde_json::to_string(base64_data).expect("string serializes");

    format!(
        r#"(() => {{
  const dropArea = document.querySelector({selector});
  if (!dropArea) return false;
  const bstr = atob({data});
  let n = bstr.length;
  const bytes = new Uint8Array(n);
  while (n--) bytes[n] = bstr.charCodeAt(n);
  const file = new File([bytes], {name}, {{ type: "image/jpeg" }});
  const transfer = new DataTransfer();
  transfer.items.add(file);
  for (const kind of ["dragover", "drop"]) {{
    dropArea.dispatchEvent(new DragEvent(kind, {{
      dataTransfer: transfer,
      bubbles: true,
      cancelable: true
    }}));
  }}
  return true;
}})()"#
    )
}

/// Pick a thumbnail from `dir`, rotating with wall-clock time.
///
/// Only common image extensions count; an empty directory is a
/// validation error surfaced before any UI work.
pub fn pick_thumbnail(dir: &Path) -> Result<std::path::PathBuf> {
    let mut images: Vec<std::path::PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| matches!(e.to_ascii_lowercase().as_str(), "jpg" | "jpeg" | "png" | "gif"))
                .unwrap_or(false)
        })
        .collect();
    images.sort();

    if images.is_empty() {
        return Err(QuillError::Validation(format!(
            "no thumbnail images in {}",
            dir.display()
        )));
    }

    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as usize)
        .unwrap_or(0);
    Ok(images[nanos % images.len()].clone())
}
