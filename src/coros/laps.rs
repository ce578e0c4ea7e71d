// ABOUTME: Schema-tolerant decoding of COROS lap trees and split-lap normalization
// ABOUTME: Keeps per-kilometre split entries and stamps each with its parent lap type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::ser::{Serialize, Serializer};
use serde::Deserialize;
use serde_json::Value;

use super::envelope::JsonMap;
use crate::constants::coros::SPLIT_LAP_TYPE;

/// Key under which the parent discriminator is stamped on each emitted lap
pub const LAP_TYPE_KEY: &str = "lapType";

/// One entry of the upstream `lapList`
///
/// Only the two fields the filter relies on are typed; everything else is
/// carried through untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLapNode {
    #[serde(rename = "type", default)]
    kind: Option<Value>,
    #[serde(rename = "lapItemList", default)]
    items: Option<Value>,
    /// Remaining fields in upstream order
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl RawLapNode {
    /// Lap type discriminator
    ///
    /// `None` when `type` is missing or is not an integral number.
    #[must_use]
    pub fn discriminator(&self) -> Option<i64> {
        let number = self.kind.as_ref()?.as_number()?;
        number
            .as_i64()
            .or_else(|| number.as_f64().and_then(integral_f64))
    }

    /// Child entries
    ///
    /// `None` when `lapItemList` is missing or is not an array.
    #[must_use]
    pub fn children(&self) -> Option<&[Value]> {
        self.items.as_ref()?.as_array().map(Vec::as_slice)
    }
}

#[allow(clippy::float_cmp)]
fn integral_f64(f: f64) -> Option<i64> {
    // 2^63; i64::MAX itself is not representable as f64
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    (f.fract() == 0.0 && f >= -BOUND && f < BOUND).then(|| f as i64)
}

/// One split entry: the child's fields plus the stamped parent lap type
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedLap {
    /// Discriminator inherited from the parent node
    pub lap_type: i64,
    /// Child fields in upstream order, `lapType` included
    pub fields: JsonMap,
}

impl NormalizedLap {
    fn stamp(lap_type: i64, mut fields: JsonMap) -> Self {
        fields.insert(LAP_TYPE_KEY.to_owned(), Value::from(lap_type));
        Self { lap_type, fields }
    }

    /// Field lookup by upstream name
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl Serialize for NormalizedLap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Keep only the children of split nodes, in upstream order
///
/// Nodes with any other discriminator, split nodes without a child list,
/// and non-object children are skipped.
#[must_use]
pub fn filter_split_laps(nodes: &[RawLapNode]) -> Vec<NormalizedLap> {
    nodes
        .iter()
        .filter(|node| node.discriminator() == Some(SPLIT_LAP_TYPE))
        .filter_map(|node| node.children().map(|children| (node, children)))
        .flat_map(|(node, children)| {
            let lap_type = node.discriminator().unwrap_or(SPLIT_LAP_TYPE);
            children
                .iter()
                .filter_map(Value::as_object)
                .map(move |child| NormalizedLap::stamp(lap_type, child.clone()))
        })
        .collect()
}

/// Decode a `lapList` value leniently
///
/// Anything other than an array yields no nodes; entries that are not
/// objects are dropped.
#[must_use]
pub fn decode_lap_list(value: Option<&Value>) -> Vec<RawLapNode> {
    value
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter(|entry| entry.is_object())
                .filter_map(|entry| RawLapNode::deserialize(entry).ok())
                .collect()
        })
        .unwrap_or_default()
}
