//! Magic-number pattern matching (spec §4.5). Patterns are lower-cased
//! hex strings with `??` standing in for "any byte", e.g. `"89504e47"`
//! or `"ff d8 ff"`/`"ff????ff"`.

/// One decoded pattern byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternByte {
	Exact(u8),
	Wildcard,
}

/// A magic-number pattern, decoded once at registry build time so probing
/// never re-parses hex on the hot path.
#[derive(Debug, Clone)]
pub struct MagicPattern {
	bytes: Vec<PatternByte>,
}

impl MagicPattern {
	/// Decodes a descriptor's magic-number string. Whitespace between hex
	/// pairs is ignored; `??` is a wildcard byte.
	pub fn parse(s: &str) -> Option<Self> {
		let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
		if cleaned.len() % 2 != 0 {
			return None;
		}
		let mut bytes = Vec::with_capacity(cleaned.len() / 2);
		let chars: Vec<char> = cleaned.chars().collect();
		for pair in chars.chunks(2) {
			let [a, b] = [pair[0], pair[1]];
			if a == '?' && b == '?' {
				bytes.push(PatternByte::Wildcard);
			} else {
				let byte = u8::from_str_radix(&format!("{a}{b}"), 16).ok()?;
				bytes.push(PatternByte::Exact(byte));
			}
		}
		Some(MagicPattern { bytes })
	}

	/// Number of leading bytes this pattern needs to see.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Whether `buffer` (already truncated/padded to however many bytes
	/// were actually read) matches this pattern from its start.
	pub fn matches(&self, buffer: &[u8]) -> bool {
		if buffer.len() < self.bytes.len() {
			return false;
		}
		self.bytes.iter().zip(buffer).all(|(pat, actual)| match pat {
			PatternByte::Exact(expected) => expected == actual,
			PatternByte::Wildcard => true,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn exact_match() {
		let pat = MagicPattern::parse("89504e47").unwrap();
		assert!(pat.matches(&[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a]));
		assert!(!pat.matches(&[0x89, 0x50, 0x4e, 0x00]));
	}

	#[test]
	fn wildcard_match() {
		let pat = MagicPattern::parse("ff??ff").unwrap();
		assert!(pat.matches(&[0xff, 0x00, 0xff]));
		assert!(pat.matches(&[0xff, 0xaa, 0xff, 0x99]));
		assert!(!pat.matches(&[0xff, 0x00, 0xee]));
	}

	#[test]
	fn too_short_buffer_does_not_match() {
		let pat = MagicPattern::parse("89504e47").unwrap();
		assert!(!pat.matches(&[0x89, 0x50]));
	}

	#[test]
	fn odd_length_is_rejected() {
		assert!(MagicPattern::parse("abc").is_none());
	}

	#[test]
	fn whitespace_between_pairs_is_ignored() {
		let pat = MagicPattern::parse("ff d8 ff").unwrap();
		assert!(pat.matches(&[0xff, 0xd8, 0xff]));
	}
}
