//! Format detection (spec §4.5, "Format detector (`probe`)").
//!
//! `probe` never reads pixels: it drives a codec through `read_init` +
//! `read_seek_next_frame` + `read_finish` to recover the first frame's
//! metadata skeleton, then leaves the source positioned where probing
//! started so a subsequent `start_reading_*` call sees the same bytes.

use std::path::Path;
use std::ptr;

use sail_types::abi::{SailIoHandle, StatusCode, STATUS_OK, status_to_kind};
use sail_types::codec_info::{CodecInfo, MAGIC_BUFFER_SIZE};
use sail_types::error::{SailError, SailErrorKind, SailResult};
use sail_types::image::Image;
use sail_types::options::ReadOptions;
use sail_vfs::Stream;

use crate::loader::PluginCache;
use crate::registry::Registry;

fn status_result(path_hint: &str, status: StatusCode) -> SailResult<()> {
	if status == STATUS_OK {
		return Ok(());
	}
	let kind = status_to_kind(status).unwrap_or(SailErrorKind::StateExecutionFail);
	Err(SailError::new(kind, format!("{path_hint} returned status {status}")))
}

/// Looks the extension up in the registry (spec §4.5 step 1).
fn probe_by_extension<'a>(registry: &'a Registry, path: &Path) -> Option<&'a CodecInfo> {
	let extension = path.extension()?.to_str()?;
	registry.by_extension(extension)
}

/// Reads up to [`MAGIC_BUFFER_SIZE`] bytes and matches against every
/// registered pattern (spec §4.5 step 2), restoring the stream position
/// before returning.
fn probe_by_magic<'a>(registry: &'a Registry, stream: &mut dyn Stream) -> SailResult<Option<&'a CodecInfo>> {
	let start = stream.tell()?;
	let mut buffer = [0u8; MAGIC_BUFFER_SIZE];
	let mut filled = 0;
	while filled < buffer.len() {
		let n = stream.read(&mut buffer[filled..])?;
		if n == 0 {
			break;
		}
		filled += n;
	}
	stream.seek(sail_vfs::SeekFrom::Start(start))?;
	Ok(registry.by_magic(&buffer[..filled]))
}

/// Drives the matched codec through `read_init` + `read_seek_next_frame`
/// + `read_finish` to recover the first frame's metadata, without ever
/// calling `read_frame` (spec §4.5: "it never calls `read_frame`").
fn probe_metadata(
	stream: &mut dyn Stream,
	info: &CodecInfo,
	cache: &PluginCache,
) -> SailResult<Image> {
	let plugin = cache.get_or_load(&info.name, &info.path)?;
	let options = ReadOptions::from_features(&info.read_features);

	let mut handle = SailIoHandle::wrap(stream);
	let mut state: *mut std::ffi::c_void = ptr::null_mut();

	// SAFETY: `plugin.v6` was resolved from symbols matching this exact
	// signature by construction (`crate::loader::resolve_table`); `handle`
	// stays alive for the whole call sequence below.
	let init_status = unsafe { (plugin.v6.read_init)(&mut handle, &options, &mut state) };
	if let Err(err) = status_result("read_init", init_status) {
		handle.release();
		return Err(err);
	}

	let mut image_ptr: *mut Image = ptr::null_mut();
	// SAFETY: see the `read_init` call above; `state` was allocated by it.
	let seek_status = unsafe { (plugin.v6.read_seek_next_frame)(state, &mut handle, &mut image_ptr) };
	let seek_result = status_result("read_seek_next_frame", seek_status);

	let mut finish_state = state;
	// SAFETY: see the `read_init` call above.
	let finish_status = unsafe { (plugin.v6.read_finish)(&mut finish_state, &mut handle) };
	let finish_result = status_result("read_finish", finish_status);

	handle.release();

	seek_result?;
	finish_result?;

	if image_ptr.is_null() {
		return Err(SailError::new(
			SailErrorKind::BrokenImage,
			format!("{}: read_seek_next_frame reported success but returned no image", info.name),
		));
	}
	// SAFETY: the codec allocated this image with the same `sail-types`
	// layout the host links against (see module doc in `sail_types::abi`).
	let image = unsafe { *Box::from_raw(image_ptr) };
	if !image.has_valid_dimensions() {
		return Err(SailError::new(
			SailErrorKind::IncorrectImageDimensions,
			format!("{}: probed image has zero width or height", info.name),
		));
	}
	Ok(image)
}

/// Identifies `stream`'s format and returns its first frame's metadata
/// alongside the matched codec descriptor (spec §4.5, §8 scenario 1-3).
///
/// `path_hint`, when present, is used for the extension check; the
/// stream itself is always used for magic-number matching when the
/// extension lookup doesn't resolve.
pub fn probe(
	stream: &mut dyn Stream,
	path_hint: Option<&Path>,
	registry: &Registry,
	cache: &PluginCache,
) -> SailResult<(Image, CodecInfo)> {
	let by_extension = path_hint.and_then(|path| probe_by_extension(registry, path));
	let info = match by_extension {
		Some(info) => info.clone(),
		None => match probe_by_magic(registry, stream)? {
			Some(info) => info.clone(),
			None => {
				return Err(SailError::new(
					SailErrorKind::UnsupportedFormat,
					"no registered codec recognised the source",
				));
			}
		},
	};

	let image = probe_metadata(stream, &info, cache)?;
	Ok((image, info))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn probe_by_extension_is_case_sensitive_to_lower_cased_index() {
		let registry = Registry::from_codec_infos(vec![]);
		let path = Path::new("tiny.bmp");
		assert!(probe_by_extension(&registry, path).is_none());
	}
}
