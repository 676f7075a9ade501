//! Wire types for the community graph payload.
//!
//! The backend has served two shapes over time: a flat array of denormalized
//! pair records (one per community pair with shared subscribers) and a
//! pre-split `{nodes, links}` document. [`EdgeListPayload`] accepts both;
//! detection is structural via an untagged enum, since a single JSON document
//! is either an array or an object and the shapes cannot mix.

use serde::{Deserialize, Deserializer};

/// Community ids arrive as JSON numbers from the database layer but as
/// strings from older payloads. Normalize both to `String`; a missing id
/// becomes empty and the adapter treats that endpoint as unresolvable.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum IdRepr {
		Num(i64),
		Text(String),
	}

	Ok(match IdRepr::deserialize(deserializer) {
		Ok(IdRepr::Num(n)) => n.to_string(),
		Ok(IdRepr::Text(s)) => s,
		Err(_) => String::new(),
	})
}

/// Counts get the same leniency as ids: numbers pass through, numeric
/// strings parse, and anything else (null, bool, float) defaults to zero so
/// one malformed field never fails the whole batch.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum CountRepr {
		Num(u64),
		Text(String),
	}

	Ok(match CountRepr::deserialize(deserializer) {
		Ok(CountRepr::Num(n)) => n,
		Ok(CountRepr::Text(s)) => s.trim().parse().unwrap_or(0),
		Err(_) => 0,
	})
}

/// One denormalized record per community pair: both endpoints' metadata plus
/// the shared subscriber count. Field names follow the backend JSON contract.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawEdge {
	/// First endpoint community id.
	#[serde(default, rename = "id_1", deserialize_with = "id_string")]
	pub source_id: String,
	/// Second endpoint community id.
	#[serde(default, rename = "id_2", deserialize_with = "id_string")]
	pub target_id: String,
	#[serde(default, rename = "name_1")]
	pub source_name: String,
	#[serde(default, rename = "desc_1")]
	pub source_description: String,
	#[serde(default, rename = "name_2")]
	pub target_name: String,
	#[serde(default, rename = "desc_2")]
	pub target_description: String,
	#[serde(default, rename = "subscribers_1", deserialize_with = "lenient_count")]
	pub source_subscribers: u64,
	#[serde(default, rename = "subscribers_2", deserialize_with = "lenient_count")]
	pub target_subscribers: u64,
	#[serde(default, rename = "common_subscribers", deserialize_with = "lenient_count")]
	pub common_subscribers: u64,
}

/// Node record in the pre-split shape. `size` is the subscriber count.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawNode {
	#[serde(default, deserialize_with = "id_string")]
	pub id: String,
	#[serde(default)]
	pub name: String,
	#[serde(default, deserialize_with = "lenient_count")]
	pub size: u64,
}

/// Link record in the pre-split shape.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawLink {
	#[serde(default, deserialize_with = "id_string")]
	pub id1: String,
	#[serde(default, deserialize_with = "id_string")]
	pub id2: String,
	#[serde(
		default,
		rename = "commonSubscribers",
		alias = "common_subscribers",
		deserialize_with = "lenient_count"
	)]
	pub common_subscribers: u64,
}

/// Pre-split graph document.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawGraph {
	#[serde(default)]
	pub nodes: Vec<RawNode>,
	#[serde(default)]
	pub links: Vec<RawLink>,
}

/// Either backend shape, detected structurally.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum EdgeListPayload {
	/// Flat array of pair records.
	Flat(Vec<RawEdge>),
	/// Pre-split `{nodes, links}` document.
	Split(RawGraph),
}

impl Default for EdgeListPayload {
	fn default() -> Self {
		Self::Flat(Vec::new())
	}
}
