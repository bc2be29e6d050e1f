//! Write forms shared by the HTTP handlers and the wizard
//!
//! Every field is optional on the wire so that absent, null and blank values
//! can all be reported the same way. `validate` trims, checks presence and
//! converts dates before anything reaches the ledger.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dates::{NumberOrText, ValueError};
use crate::records::{
    NewBatch, NewCertificate, NewCultivation, NewFarmerInfo, NewLabResult, NewProcessing,
    NewTraceData, NewTransfer,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("All fields are required")]
    MissingFields,

    #[error("{field}: {source}")]
    Invalid {
        field: &'static str,
        source: ValueError,
    },
}

fn text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn loose(value: &Option<NumberOrText>) -> Option<&NumberOrText> {
    value.as_ref().filter(|v| !v.is_blank())
}

fn timestamp(field: &'static str, value: &NumberOrText) -> Result<u64, FormError> {
    value
        .to_timestamp()
        .map_err(|source| FormError::Invalid { field, source })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchForm {
    pub batch_id: Option<String>,
    pub crop_name: Option<String>,
    pub variety: Option<String>,
    pub location: Option<String>,
    pub harvest_date: Option<NumberOrText>,
}

impl BatchForm {
    pub fn validate(&self) -> Result<NewBatch, FormError> {
        let (Some(batch_id), Some(crop_name), Some(variety), Some(location), Some(harvest_date)) = (
            text(&self.batch_id),
            text(&self.crop_name),
            text(&self.variety),
            text(&self.location),
            loose(&self.harvest_date),
        ) else {
            return Err(FormError::MissingFields);
        };

        Ok(NewBatch {
            batch_id,
            crop_name,
            variety,
            location,
            harvest_date: timestamp("harvestDate", harvest_date)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerForm {
    pub batch_id: Option<String>,
    pub farmer_name: Option<String>,
    pub farm_location: Option<String>,
    pub contact: Option<String>,
    pub farmer_id: Option<String>,
}

impl FarmerForm {
    pub fn validate(&self) -> Result<(String, NewFarmerInfo), FormError> {
        let (Some(batch_id), Some(farmer_name), Some(farm_location), Some(contact), Some(farmer_id)) = (
            text(&self.batch_id),
            text(&self.farmer_name),
            text(&self.farm_location),
            text(&self.contact),
            text(&self.farmer_id),
        ) else {
            return Err(FormError::MissingFields);
        };

        Ok((
            batch_id,
            NewFarmerInfo {
                farmer_name,
                farm_location,
                contact,
                farmer_id,
            },
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CultivationForm {
    pub batch_id: Option<String>,
    pub soil_type: Option<String>,
    pub irrigation_type: Option<String>,
    pub pesticide_used: Option<String>,
    pub sowing_date: Option<NumberOrText>,
    pub area: Option<NumberOrText>,
}

impl CultivationForm {
    pub fn validate(&self) -> Result<(String, NewCultivation), FormError> {
        let (
            Some(batch_id),
            Some(soil_type),
            Some(irrigation_type),
            Some(pesticide_used),
            Some(sowing_date),
            Some(area),
        ) = (
            text(&self.batch_id),
            text(&self.soil_type),
            text(&self.irrigation_type),
            text(&self.pesticide_used),
            loose(&self.sowing_date),
            loose(&self.area),
        )
        else {
            return Err(FormError::MissingFields);
        };

        let area = area
            .to_number()
            .map_err(|source| FormError::Invalid { field: "area", source })?;

        Ok((
            batch_id,
            NewCultivation {
                soil_type,
                irrigation_type,
                pesticide_used,
                sowing_date: timestamp("sowingDate", sowing_date)?,
                area,
            },
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingForm {
    pub batch_id: Option<String>,
    pub processor_name: Option<String>,
    pub method: Option<String>,
    pub processing_date: Option<NumberOrText>,
    pub processing_unit_id: Option<String>,
}

impl ProcessingForm {
    pub fn validate(&self) -> Result<(String, NewProcessing), FormError> {
        let (
            Some(batch_id),
            Some(processor_name),
            Some(method),
            Some(processing_date),
            Some(processing_unit_id),
        ) = (
            text(&self.batch_id),
            text(&self.processor_name),
            text(&self.method),
            loose(&self.processing_date),
            text(&self.processing_unit_id),
        )
        else {
            return Err(FormError::MissingFields);
        };

        Ok((
            batch_id,
            NewProcessing {
                processor_name,
                method,
                processing_date: timestamp("processingDate", processing_date)?,
                processing_unit_id,
            },
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabResultForm {
    pub batch_id: Option<String>,
    pub lab_name: Option<String>,
    pub result: Option<String>,
    pub test_date: Option<NumberOrText>,
    pub report_hash: Option<String>,
}

impl LabResultForm {
    pub fn validate(&self) -> Result<(String, NewLabResult), FormError> {
        let (Some(batch_id), Some(lab_name), Some(result), Some(test_date), Some(report_hash)) = (
            text(&self.batch_id),
            text(&self.lab_name),
            text(&self.result),
            loose(&self.test_date),
            text(&self.report_hash),
        ) else {
            return Err(FormError::MissingFields);
        };

        Ok((
            batch_id,
            NewLabResult {
                lab_name,
                result,
                test_date: timestamp("testDate", test_date)?,
                report_hash,
            },
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateForm {
    pub batch_id: Option<String>,
    pub issued_by: Option<String>,
    pub certificate_type: Option<String>,
    pub issue_date: Option<NumberOrText>,
    pub certificate_id: Option<String>,
}

impl CertificateForm {
    pub fn validate(&self) -> Result<(String, NewCertificate), FormError> {
        let (
            Some(batch_id),
            Some(issued_by),
            Some(certificate_type),
            Some(issue_date),
            Some(certificate_id),
        ) = (
            text(&self.batch_id),
            text(&self.issued_by),
            text(&self.certificate_type),
            loose(&self.issue_date),
            text(&self.certificate_id),
        )
        else {
            return Err(FormError::MissingFields);
        };

        Ok((
            batch_id,
            NewCertificate {
                issued_by,
                certificate_type,
                issue_date: timestamp("issueDate", issue_date)?,
                certificate_id,
            },
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferForm {
    pub batch_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub purpose: Option<String>,
    pub transfer_date: Option<NumberOrText>,
}

impl TransferForm {
    pub fn validate(&self) -> Result<(String, NewTransfer), FormError> {
        let (Some(batch_id), Some(from), Some(to), Some(purpose), Some(transfer_date)) = (
            text(&self.batch_id),
            text(&self.from),
            text(&self.to),
            text(&self.purpose),
            loose(&self.transfer_date),
        ) else {
            return Err(FormError::MissingFields);
        };

        Ok((
            batch_id,
            NewTransfer {
                from,
                to,
                purpose,
                transfer_date: timestamp("transferDate", transfer_date)?,
            },
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceForm {
    pub batch_id: Option<String>,
    pub notes: Option<String>,
    pub qr_code_hash: Option<String>,
}

impl TraceForm {
    pub fn validate(&self) -> Result<(String, NewTraceData), FormError> {
        let (Some(batch_id), Some(notes), Some(qr_code_hash)) = (
            text(&self.batch_id),
            text(&self.notes),
            text(&self.qr_code_hash),
        ) else {
            return Err(FormError::MissingFields);
        };

        Ok((batch_id, NewTraceData { notes, qr_code_hash }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_form() -> BatchForm {
        BatchForm {
            batch_id: Some("  ERD-TUR-2025-001 ".to_string()),
            crop_name: Some("Turmeric".to_string()),
            variety: Some("Erode Manjal".to_string()),
            location: Some("Erode, Tamil Nadu".to_string()),
            harvest_date: Some("2025-01-01".into()),
        }
    }

    #[test]
    fn test_batch_form_trims_and_converts() {
        let batch = batch_form().validate().unwrap();
        assert_eq!(batch.batch_id, "ERD-TUR-2025-001");
        assert_eq!(batch.harvest_date, 1735689600);
    }

    #[test]
    fn test_absent_null_and_blank_are_missing() {
        let mut absent = batch_form();
        absent.variety = None;
        assert_eq!(absent.validate(), Err(FormError::MissingFields));

        let mut blank = batch_form();
        blank.location = Some("   ".to_string());
        assert_eq!(blank.validate(), Err(FormError::MissingFields));

        let mut blank_date = batch_form();
        blank_date.harvest_date = Some("".into());
        assert_eq!(blank_date.validate(), Err(FormError::MissingFields));

        let null: TraceForm =
            serde_json::from_str(r#"{"batchId":"B1","notes":null,"qrCodeHash":"QR"}"#).unwrap();
        assert_eq!(null.validate(), Err(FormError::MissingFields));
    }

    #[test]
    fn test_zero_is_a_value() {
        let form: TransferForm = serde_json::from_str(
            r#"{"batchId":"B1","from":"Farmer","to":"Processor","purpose":"Processing","transferDate":0}"#,
        )
        .unwrap();
        let (_, transfer) = form.validate().unwrap();
        assert_eq!(transfer.transfer_date, 0);
    }

    #[test]
    fn test_unparsable_values_name_the_field() {
        let mut form = batch_form();
        form.harvest_date = Some("next tuesday".into());
        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "harvestDate: Invalid date: next tuesday");

        let form: CultivationForm = serde_json::from_str(
            r#"{"batchId":"B1","soilType":"Loamy","irrigationType":"Drip",
                "pesticideUsed":"None","sowingDate":"2024-09-03","area":"ten"}"#,
        )
        .unwrap();
        assert!(matches!(
            form.validate(),
            Err(FormError::Invalid { field: "area", .. })
        ));
    }

    #[test]
    fn test_cultivation_accepts_numeric_strings() {
        let form: CultivationForm = serde_json::from_str(
            r#"{"batchId":"B1","soilType":"Loamy","irrigationType":"Drip",
                "pesticideUsed":"Organic Neem","sowingDate":1725321600,"area":"10000"}"#,
        )
        .unwrap();
        let (batch_id, cultivation) = form.validate().unwrap();
        assert_eq!(batch_id, "B1");
        assert_eq!(cultivation.area, 10000);
        assert_eq!(cultivation.sowing_date, 1725321600);
    }
}
