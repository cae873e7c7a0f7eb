use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// One structured dictionary entry as returned by the backend.
///
/// Only the headword, part of speech, and definition sections are required;
/// everything else is optional filler that individual entries may or may
/// not carry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DictionaryEntry {
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub homograph_number: Option<u32>,
    pub headword_info: HeadwordInfo,
    #[serde(default)]
    pub alternate_headwords: Vec<HeadwordInfo>,
    pub part_of_speech: String,
    #[serde(default)]
    pub grammatical_note: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    pub definition_sections: Vec<DefinitionSection>,
    #[serde(default)]
    pub idioms: Vec<Idiom>,
    #[serde(default)]
    pub etymology: Vec<String>,
    #[serde(default)]
    pub first_use_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub sort: String,
    #[serde(default)]
    pub stems: Vec<String>,
    #[serde(default)]
    pub offensive: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HeadwordInfo {
    pub headword: String,
    #[serde(default)]
    pub pronunciations: Vec<Pronunciation>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Pronunciation {
    #[serde(default)]
    pub mw: String,
    #[serde(default)]
    pub sound: Option<Sound>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sound {
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,
    #[serde(default)]
    pub stat: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DefinitionSection {
    #[serde(default)]
    pub sense_sequences: Vec<Vec<Sense>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sense {
    #[serde(default)]
    pub defining_text: Option<DefiningText>,
    #[serde(default)]
    pub grammatical_label: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub sense_number: String,
    #[serde(default)]
    pub subject_status_labels: Vec<String>,
    #[serde(default, rename = "type")]
    pub sense_type: String,
    #[serde(default)]
    pub divided_sense: Option<DividedSense>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DividedSense {
    #[serde(default)]
    pub defining_text: Option<DefiningText>,
    #[serde(default)]
    pub sense_divider: Option<String>,
    #[serde(default)]
    pub grammatical_label: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub subject_status_labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DefiningText {
    #[serde(default)]
    pub text: Vec<String>,
    #[serde(default)]
    pub verbal_illustrations: Vec<VerbalIllustration>,
    #[serde(default)]
    pub usage_notes: Vec<UsageNote>,
    #[serde(default)]
    pub run_in: Option<RunIn>,
    #[serde(default)]
    pub supplemental_note: Option<SupplementalNote>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VerbalIllustration {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UsageNote {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunIn {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub entries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SupplementalNote {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Idiom {
    #[serde(default)]
    pub phrase: String,
    #[serde(default)]
    pub definitions: Vec<IdiomDefinition>,
    #[serde(default)]
    pub phrase_variants: Vec<IdiomVariant>,
    #[serde(default)]
    pub verbal_illustrations: Vec<VerbalIllustration>,
    #[serde(default)]
    pub subject_status_labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IdiomDefinition {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IdiomVariant {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub label: String,
}

/// Validates raw backend entries one by one. Entries that do not match the
/// expected shape are dropped; a response where nothing validates is an
/// empty result set, not an error.
pub fn validate_entries(raw: Vec<Value>) -> Vec<DictionaryEntry> {
    let total = raw.len();
    let entries: Vec<DictionaryEntry> = raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    if entries.len() < total {
        debug!("dropped {} malformed entries", total - entries.len());
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_entry(word: &str) -> Value {
        json!({
            "headword_info": { "headword": word },
            "part_of_speech": "adjective",
            "definition_sections": [
                { "sense_sequences": [[{
                    "sense_number": "1",
                    "defining_text": { "text": ["{bc}eager to learn"] }
                }]] }
            ]
        })
    }

    #[test]
    fn test_valid_entry_parses() {
        let entries = validate_entries(vec![valid_entry("curious")]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].headword_info.headword, "curious");
        assert_eq!(entries[0].part_of_speech, "adjective");
        assert_eq!(entries[0].definition_sections.len(), 1);
    }

    #[test]
    fn test_malformed_entries_are_dropped_individually() {
        let raw = vec![
            valid_entry("curious"),
            json!({ "word": "not an entry" }),
            json!(42),
            json!({ "headword_info": { "headword": "cat" }, "part_of_speech": "noun" }),
            valid_entry("cat"),
        ];

        let entries = validate_entries(raw);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].headword_info.headword, "curious");
        assert_eq!(entries[1].headword_info.headword, "cat");
    }

    #[test]
    fn test_sound_ref_field_is_renamed() {
        let entry: Pronunciation = serde_json::from_value(json!({
            "mw": "ˈkyu̇r-ē-əs",
            "sound": { "audio": "curiou01", "ref": "c", "stat": "1" }
        }))
        .unwrap();
        assert_eq!(entry.sound.unwrap().reference.as_deref(), Some("c"));
    }
}
