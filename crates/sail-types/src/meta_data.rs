//! Key-value metadata chains (spec §3 "Meta-data node").
//!
//! The original C source threads these as a singly-linked list; here the
//! chain is an ordered `Vec` owned by the image, which preserves
//! iteration order (first node = first written) on copy for free
//! (Design Notes §9 "Linked-list meta-data").

use std::fmt;

/// A well-known metadata key, or [`MetaDataKey::Unknown`] for anything a
/// codec exposes that this engine doesn't have a name for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetaDataKey {
	/// Not one of the well-known keys below; the original string is
	/// carried in [`MetaDataNode::key_unknown`].
	Unknown,
	/// Image author / artist.
	Author,
	/// Free-form description.
	Description,
	/// Copyright notice.
	Copyright,
	/// Creation timestamp, codec-specific format.
	CreationTime,
	/// Software that produced the image.
	Software,
}

impl fmt::Display for MetaDataKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			MetaDataKey::Unknown => "Unknown",
			MetaDataKey::Author => "Author",
			MetaDataKey::Description => "Description",
			MetaDataKey::Copyright => "Copyright",
			MetaDataKey::CreationTime => "CreationTime",
			MetaDataKey::Software => "Software",
		};
		f.write_str(s)
	}
}

impl MetaDataKey {
	/// All keys with a defined string form, for the round-trip law in
	/// spec §8 (`meta_data_from_string(meta_data_to_string(k)) == k`).
	pub const DEFINED: &'static [MetaDataKey] = &[
		MetaDataKey::Author,
		MetaDataKey::Description,
		MetaDataKey::Copyright,
		MetaDataKey::CreationTime,
		MetaDataKey::Software,
	];

	/// Renders a key to its canonical string form. `Unknown` has no
	/// canonical form by itself; see [`MetaDataNode::key_unknown`].
	pub fn to_str(&self) -> &'static str {
		match self {
			MetaDataKey::Unknown => "Unknown",
			MetaDataKey::Author => "Author",
			MetaDataKey::Description => "Description",
			MetaDataKey::Copyright => "Copyright",
			MetaDataKey::CreationTime => "CreationTime",
			MetaDataKey::Software => "Software",
		}
	}

	/// Parses a key's canonical string form back to a [`MetaDataKey`],
	/// falling back to `Unknown` for anything unrecognised.
	pub fn from_str(s: &str) -> Self {
		match s {
			"Author" => MetaDataKey::Author,
			"Description" => MetaDataKey::Description,
			"Copyright" => MetaDataKey::Copyright,
			"CreationTime" => MetaDataKey::CreationTime,
			"Software" => MetaDataKey::Software,
			_ => MetaDataKey::Unknown,
		}
	}
}

/// Whether a metadata value is text or an opaque blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
	/// UTF-8 text.
	String,
	/// Opaque bytes (e.g. an embedded XMP packet).
	Data,
}

/// One node of the metadata chain.
///
/// Invariant: `key_unknown` is `Some` if and only if `key ==
/// MetaDataKey::Unknown` (spec §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaDataNode {
	key: MetaDataKey,
	key_unknown: Option<String>,
	/// Whether `value` is text or opaque data.
	pub value_type: ValueType,
	/// The value's bytes. For `ValueType::String` these are valid UTF-8.
	pub value: Vec<u8>,
}

impl MetaDataNode {
	/// Builds a node for a well-known key.
	pub fn new(key: MetaDataKey, value_type: ValueType, value: Vec<u8>) -> Self {
		debug_assert_ne!(key, MetaDataKey::Unknown, "use MetaDataNode::unknown for unrecognised keys");
		Self { key, key_unknown: None, value_type, value }
	}

	/// Builds a node for a key this engine doesn't recognise, preserving
	/// the codec's original string.
	pub fn unknown(key_unknown: impl Into<String>, value_type: ValueType, value: Vec<u8>) -> Self {
		Self { key: MetaDataKey::Unknown, key_unknown: Some(key_unknown.into()), value_type, value }
	}

	/// The node's key.
	pub fn key(&self) -> &MetaDataKey {
		&self.key
	}

	/// The original string for an unknown key, or `None` for a
	/// well-known key.
	pub fn key_unknown(&self) -> Option<&str> {
		self.key_unknown.as_deref()
	}
}

/// An ordered chain of metadata nodes, owned by the image that carries
/// it. Iteration order is significant and preserved on [`Clone`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaDataChain {
	nodes: Vec<MetaDataNode>,
}

impl MetaDataChain {
	/// An empty chain.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a node, preserving write order.
	pub fn push(&mut self, node: MetaDataNode) {
		self.nodes.push(node);
	}

	/// Iterates the chain in write order (first written, first yielded).
	pub fn iter(&self) -> impl Iterator<Item = &MetaDataNode> {
		self.nodes.iter()
	}

	/// Number of nodes in the chain.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Whether the chain has no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trips_every_defined_key() {
		for key in MetaDataKey::DEFINED {
			assert_eq!(&MetaDataKey::from_str(key.to_str()), key);
		}
	}

	#[test]
	fn unknown_key_carries_original_string() {
		let node = MetaDataNode::unknown("x-custom-tag", ValueType::String, b"value".to_vec());
		assert_eq!(node.key(), &MetaDataKey::Unknown);
		assert_eq!(node.key_unknown(), Some("x-custom-tag"));
	}

	#[test]
	fn chain_preserves_write_order_on_clone() {
		let mut chain = MetaDataChain::new();
		chain.push(MetaDataNode::new(MetaDataKey::Author, ValueType::String, b"a".to_vec()));
		chain.push(MetaDataNode::new(MetaDataKey::Software, ValueType::String, b"b".to_vec()));
		let cloned = chain.clone();
		let keys: Vec<_> = cloned.iter().map(|n| n.key().clone()).collect();
		assert_eq!(keys, vec![MetaDataKey::Author, MetaDataKey::Software]);
	}
}
