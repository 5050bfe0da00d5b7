use intake_core::models::record::FormRecord;
use intake_instruments::instruments::epworth::{self, SleepinessBand};
use intake_instruments::error::InstrumentError;
use intake_instruments::{
    Instrument, all_instruments, get_instrument, require_instrument, validate_all,
};

#[test]
fn registered_instruments_have_unique_ids() {
    let ids: Vec<String> = all_instruments().iter().map(|i| i.id().to_string()).collect();
    let mut deduped = ids.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(ids.len(), deduped.len());
    assert!(get_instrument("epworth").is_some());
    assert!(get_instrument("psqi").is_none());
    assert!(matches!(
        require_instrument("psqi"),
        Err(InstrumentError::UnknownInstrument(id)) if id == "psqi"
    ));
}

#[test]
fn band_boundary_is_above_ten() {
    assert_eq!(epworth::classify(0), SleepinessBand::Normal);
    assert_eq!(epworth::classify(10), SleepinessBand::Normal);
    assert_eq!(epworth::classify(11), SleepinessBand::Excessive);
    assert_eq!(epworth::classify(24), SleepinessBand::Excessive);
    assert_eq!(SleepinessBand::Excessive.label(), "Sonolência excessiva");
}

#[test]
fn interpret_reads_cached_total() {
    let mut record = FormRecord::default();
    record.epworth.epworth_reading = 3;
    record.epworth.epworth_total = 14;
    let reading = epworth::Epworth.interpret(&record).unwrap();
    assert_eq!(reading.score, 14);
    assert_eq!(reading.label, "Sonolência excessiva");
}

#[test]
fn entries_cover_items_and_total() {
    let mut record = FormRecord::default();
    record.epworth.epworth_traffic = 2;
    let entries = epworth::Epworth.entries(&record);
    assert_eq!(entries.len(), 9);
    assert_eq!(entries[7].subscale_id, "epworth_traffic");
    assert_eq!(entries[7].value, 2.0);
    assert_eq!(entries[8].subscale_id, "epworth_total");
}

#[test]
fn default_record_is_in_range() {
    assert!(validate_all(&FormRecord::default()).is_empty());
}

#[test]
fn out_of_range_values_are_reported() {
    let mut record = FormRecord::default();
    record.epworth.epworth_tv = 5;
    record.epworth.epworth_total = 5;
    record.sleep.snoring_intensity = 11;

    let errors = validate_all(&record);
    let ids: Vec<&str> = errors.iter().map(|e| e.subscale_id.as_str()).collect();
    assert_eq!(ids, vec!["epworth_tv", "snoring_intensity"]);
    assert!(errors[0].message.contains("[0, 3]"));
}

#[test]
fn negative_total_is_out_of_range() {
    let mut record = FormRecord::default();
    record.epworth.epworth_total = -1;
    let errors = epworth::Epworth.validate_record(&record);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].subscale_id, "epworth_total");
}
