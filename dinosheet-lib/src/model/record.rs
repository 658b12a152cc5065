//! Records and their nested stat groups.

use serde::{Deserialize, Deserializer};

use super::value::{FieldValue, lenient};
use crate::accessor::{self, SortValue};
use crate::columns::ColumnKey;

/// Growth percentages at which a species unlocks each milestone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GrowthThresholds {
    pub first_mutation: Option<FieldValue>,
    pub second_mutation: Option<FieldValue>,
    pub third_mutation: Option<FieldValue>,
    pub sanctuary_mushroom: Option<FieldValue>,
    pub sanctuary_lockout: Option<FieldValue>,
}

/// Adult stats.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub weight_kg: Option<FieldValue>,
    pub weight_prime: Option<FieldValue>,
    #[serde(rename = "bite_force_N")]
    pub bite_force_n: Option<FieldValue>,
    pub speed_kmh: Option<FieldValue>,
    pub carry_weight_perc: Option<FieldValue>,
}

/// Group size limits, without and with the social mutation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PackSize {
    pub base: Option<FieldValue>,
    pub with_social: Option<FieldValue>,
}

/// One entry of a feed exactly as deserialized.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub growth_thresholds: GrowthThresholds,
    #[serde(default, deserialize_with = "lenient")]
    pub stats: Stats,
    #[serde(default, deserialize_with = "lenient")]
    pub pack_size: PackSize,
    #[serde(default, deserialize_with = "recommendations")]
    pub mutation_recs: Vec<String>,
}

/// Reads the recommendation list. A non-list value reads as empty; list items
/// keep their order and are stringified.
fn recommendations<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Vec<Option<FieldValue>> = lenient(deserializer)?;
    Ok(items
        .into_iter()
        .map(|item| match item {
            Some(value) => value.text().map(|t| t.into_owned()).unwrap_or_default(),
            None => "null".to_string(),
        })
        .collect())
}

/// Diet category of a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Carnivore,
    Herbivore,
    Omnivore,
    Ai,
}

impl Category {
    /// Parses a category tag. Tags are matched exactly.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Carnivore" => Some(Self::Carnivore),
            "Herbivore" => Some(Self::Herbivore),
            "Omnivore" => Some(Self::Omnivore),
            "AI" => Some(Self::Ai),
            _ => None,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Carnivore => "🍖",
            Self::Herbivore => "🌿",
            Self::Omnivore => "🥚",
            Self::Ai => "🤖",
        }
    }
}

/// A loaded record.
///
/// `original_index` is the record's position in the feed and never changes.
/// Sort values are extracted once here so sorting never re-reads raw fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    original_index: usize,
    raw: RawRecord,
    values: Vec<SortValue>,
}

impl Record {
    pub fn new(original_index: usize, raw: RawRecord) -> Self {
        let values = ColumnKey::ALL
            .iter()
            .map(|key| accessor::extract(&raw, *key))
            .collect();
        Self {
            original_index,
            raw,
            values,
        }
    }

    pub fn original_index(&self) -> usize {
        self.original_index
    }

    pub fn raw(&self) -> &RawRecord {
        &self.raw
    }

    pub fn name(&self) -> Option<&str> {
        self.raw.name.as_deref()
    }

    pub fn category(&self) -> Option<Category> {
        self.raw.category.as_deref().and_then(Category::from_tag)
    }

    /// AI-controlled species are hidden unless explicitly requested and are
    /// never printed.
    pub fn is_ai(&self) -> bool {
        self.category() == Some(Category::Ai)
    }

    pub fn recommendations(&self) -> &[String] {
        &self.raw.mutation_recs
    }

    /// The normalized sort value for a column.
    pub fn value(&self, key: ColumnKey) -> &SortValue {
        &self.values[key.index()]
    }
}

/// Assigns `original_index` in feed order.
pub fn index_records(raws: impl IntoIterator<Item = RawRecord>) -> Vec<Record> {
    raws.into_iter()
        .enumerate()
        .map(|(index, raw)| Record::new(index, raw))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_record() {
        let yaml = r#"
name: Carnotaurus
type: Carnivore
growth_thresholds: "not a map"
stats:
  weight_kg: 3000
  bite_force_N: "1500"
  speed_kmh: { nested: true }
pack_size:
  base: 2
mutation_recs: "should be a list"
"#;
        let raw: RawRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(raw.name.as_deref(), Some("Carnotaurus"));
        assert_eq!(raw.growth_thresholds, GrowthThresholds::default());
        assert_eq!(raw.stats.weight_kg, Some(FieldValue::Number(3000.0)));
        assert_eq!(raw.stats.bite_force_n, Some(FieldValue::Text("1500".into())));
        assert!(raw.stats.speed_kmh.as_ref().is_some_and(FieldValue::is_blank));
        assert!(raw.mutation_recs.is_empty());
    }

    #[test]
    fn test_recommendations_keep_order() {
        let yaml = "mutation_recs: [Hematophagy, 3, Reabsorption, Hematophagy]";
        let raw: RawRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            raw.mutation_recs,
            vec!["Hematophagy", "3", "Reabsorption", "Hematophagy"]
        );
    }

    #[test]
    fn test_index_records() {
        let records = index_records(vec![RawRecord::default(), RawRecord::default()]);
        let indices: Vec<_> = records.iter().map(Record::original_index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_category() {
        assert_eq!(Category::from_tag("AI"), Some(Category::Ai));
        assert_eq!(Category::from_tag("carnivore"), None);
    }
}
