//! Demo auto-fill data
//!
//! Realistic values for the export certificate forms, keyed by field name.
//! Three alternative sets give some variety between demo runs.

use indexmap::IndexMap;
use serde_json::{json, Value};

/// One set of sample values keyed by field name
#[derive(Clone, Debug, PartialEq)]
pub struct SampleSet(IndexMap<String, Value>);

impl SampleSet {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<Value> for SampleSet {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => SampleSet(map.into_iter().collect()),
            _ => SampleSet(IndexMap::new()),
        }
    }
}

/// Ordered sample sets; the first is the default
#[derive(Clone, Debug, PartialEq)]
pub struct SampleData {
    sets: Vec<SampleSet>,
}

impl SampleData {
    pub fn new(sets: Vec<SampleSet>) -> Self {
        Self { sets }
    }

    /// The three built-in sets
    pub fn builtin() -> Self {
        Self::new(vec![
            json!({
                "consigneeName": "British Wellness Imports Ltd.",
                "consigneeAddress": "45 Trade Centre Avenue\nLondon, E14 5HP\nUnited Kingdom",
                "countryOfDestination": "GB",
                "productDescription": "Organic Desiccated Coconut (Fine Grade)",
                "batchLotNumbers": "DC-2026-JAN-05",
                "productionExpiryDates": "Production: 2026-01-15, Expiry: 2027-01-15",
                "microbiologicalTestReportId": "ITI/2026/LAB-9982",
                "processingPlantRegistrationNo": "CDA/REG/2025/158",
                "distinguishingMarks": "BWI-UK-LOT01",
                "disinfestationTreatment": "Fumigation with Methyl Bromide (CH3Br) at 48g/m³ for 24 hrs",
                "totalInvoiceValue": "1,250,000 LKR",
                "totalPackages": 25,
                "totalNetWeight": 1500.5
            })
            .into(),
            json!({
                "consigneeName": "Euro Organic Foods GmbH",
                "consigneeAddress": "Handelstraße 89\n10115 Berlin\nGermany",
                "countryOfDestination": "DE",
                "productDescription": "Organic Virgin Coconut Oil (Cold Pressed)",
                "batchLotNumbers": "VCO-2026-FEB-12",
                "productionExpiryDates": "Production: 2026-02-10, Expiry: 2028-02-10",
                "microbiologicalTestReportId": "ITI/2026/LAB-10234",
                "processingPlantRegistrationNo": "CDA/REG/2025/201",
                "distinguishingMarks": "EOF-DE-LOT02",
                "disinfestationTreatment": "Heat Treatment at 56°C for 30 minutes",
                "totalInvoiceValue": "2,800,000 LKR",
                "totalPackages": 40,
                "totalNetWeight": 2400.0
            })
            .into(),
            json!({
                "consigneeName": "Pacific Natural Trading Co.",
                "consigneeAddress": "1250 Harbor Boulevard\nSan Francisco, CA 94107\nUnited States",
                "countryOfDestination": "US",
                "productDescription": "Organic Coconut Flour (Premium Grade)",
                "batchLotNumbers": "CF-2026-MAR-18",
                "productionExpiryDates": "Production: 2026-03-20, Expiry: 2027-03-20",
                "microbiologicalTestReportId": "ITI/2026/LAB-11056",
                "processingPlantRegistrationNo": "CDA/REG/2025/089",
                "distinguishingMarks": "PNT-US-LOT03",
                "disinfestationTreatment": "Phosphine (PH3) fumigation at 2g/m³ for 72 hrs",
                "totalInvoiceValue": "950,000 LKR",
                "totalPackages": 15,
                "totalNetWeight": 850.25
            })
            .into(),
        ])
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// The set at `index`, falling back to the first set
    pub fn set(&self, index: usize) -> Option<&SampleSet> {
        self.sets.get(index).or_else(|| self.sets.first())
    }

    /// Sample value for a field name
    pub fn value_for(&self, field: &str, set: usize) -> Option<&Value> {
        self.set(set)?.get(field)
    }
}

impl Default for SampleData {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_sets() {
        let data = SampleData::builtin();
        assert_eq!(data.len(), 3);
        assert_eq!(data.value_for("countryOfDestination", 0), Some(&json!("GB")));
        assert_eq!(data.value_for("countryOfDestination", 1), Some(&json!("DE")));
        assert_eq!(data.value_for("totalNetWeight", 2), Some(&json!(850.25)));
        assert_eq!(data.value_for("unknownField", 0), None);
    }

    #[test]
    fn test_out_of_range_set_falls_back_to_first() {
        let data = SampleData::builtin();
        assert_eq!(data.value_for("consigneeName", 9), data.value_for("consigneeName", 0));
    }

    #[test]
    fn test_sets_share_field_names() {
        let data = SampleData::builtin();
        let first: Vec<&str> = data.set(0).unwrap().fields().collect();
        for index in 1..data.len() {
            let other: Vec<&str> = data.set(index).unwrap().fields().collect();
            assert_eq!(first, other);
        }
    }
}
