use std::sync::Once;

use seaward_gar::error::Error;
use seaward_gar::sss::{parse_sss, PhysicalTestResult, SssRecord};

static LOG_INIT: Once = Once::new();

fn init_logging() {
    LOG_INIT.call_once(|| {
        stderrlog::new().verbosity(4).init().unwrap();
    });
}

fn checksum(region: &[u8]) -> u16 {
    let sum: u32 = region.iter().map(|&b| b as u32).sum();
    (sum & 0xFFFF) as u16
}

fn wrap_record(record_type: u8, body: &[u8]) -> Vec<u8> {
    let mut region = vec![record_type];
    region.extend_from_slice(body);
    region.push(0xFF);
    let computed = checksum(&region);

    let mut record = vec![0x54u8];
    record.extend_from_slice(&(region.len() as u16).to_le_bytes());
    record.extend_from_slice(&computed.to_le_bytes());
    record.extend_from_slice(&[0x00, 0x00]);
    record.extend_from_slice(&region);
    record
}

fn fixed(s: &str, len: usize) -> Vec<u8> {
    let mut buf = s.as_bytes().to_vec();
    assert!(buf.len() <= len, "{s:?} does not fit in {len} bytes");
    buf.resize(len, 0);
    buf
}

fn machine_info_body() -> Vec<u8> {
    let mut body = fixed("Apollo 600+", 20);
    body.extend(fixed("SN-001122", 20));
    body
}

fn test_record_body_with_rcd() -> Vec<u8> {
    let mut body = Vec::new();
    body.push(0b0000_0000); // result_flags: neither pass nor fail set
    body.extend(fixed("unit-1", 16));
    body.extend(std::iter::repeat(0u8).take(64));
    body.extend(fixed("Test Venue", 16));
    body.extend(fixed("Room 4", 16));
    body.extend([9, 5, 0, 1, 3]); // hour, minute, second, day, month
    body.extend(2023u16.to_le_bytes());
    body.extend(fixed("Inspector", 16));
    body.extend(fixed("routine check", 128));
    body.push(0x02);
    body.push(12);
    body.extend(fixed("PAT", 30));
    body.push(6);
    body.extend(std::iter::repeat(0u8).take(15));
    body.push(0); // empty test_config
    body.push(0xFE);
    // no visual results
    // one physical result: rcd, pass
    body.push(PhysicalTestResult::TAG_RCD);
    body.extend(600u16.to_le_bytes()); // significand 600, exponent 0 -> 600.0 mA
    body.extend(180u16.to_le_bytes()); // cycle_angle 180.0 deg
    let trip_time: u16 = 200 | (1 << 14); // significand 200, exponent 1 -> 20.0 ms
    body.extend(trip_time.to_le_bytes());
    body.push(0b0000_0001); // pass
    body
}

#[test]
fn parses_machine_info_test_and_end_in_sequence() {
    init_logging();
    let mut bytes = wrap_record(0x55, &machine_info_body());
    bytes.extend(wrap_record(0x01, &test_record_body_with_rcd()));
    bytes.extend(wrap_record(0xAA, &[]));

    let records = parse_sss(&bytes).unwrap();
    assert_eq!(records.len(), 3);

    match &records[0] {
        SssRecord::MachineInfo(info) => {
            assert_eq!(info.machine, "Apollo 600+");
            assert_eq!(info.serial, "SN-001122");
        }
        other => panic!("expected MachineInfo, got {other:?}"),
    }

    match &records[1] {
        SssRecord::Test(test) => {
            assert_eq!(test.id, "unit-1");
            assert_eq!(test.physical_test_results.len(), 1);
            match &test.physical_test_results[0] {
                PhysicalTestResult::Rcd {
                    test_current_ma,
                    cycle_angle_deg,
                    trip_time_ms,
                    result,
                } => {
                    assert_eq!(*test_current_ma, 600.0);
                    assert_eq!(*cycle_angle_deg, 180.0);
                    assert_eq!(*trip_time_ms, 20.0);
                    assert!(result.pass);
                }
                other => panic!("expected Rcd, got {other:?}"),
            }
        }
        other => panic!("expected Test, got {other:?}"),
    }

    assert_eq!(records[2], SssRecord::End);
}

#[test]
fn stream_without_trailing_end_record_is_rejected() {
    let bytes = wrap_record(0x55, &machine_info_body());
    match parse_sss(&bytes) {
        Err(Error::MissingTerminator { .. }) => {}
        other => panic!("expected MissingTerminator, got {other:?}"),
    }
}

#[test]
fn unknown_record_type_is_rejected() {
    let bytes = wrap_record(0x77, &[]);
    match parse_sss(&bytes) {
        Err(Error::UnknownVariant { tag: 0x77, .. }) => {}
        other => panic!("expected UnknownVariant, got {other:?}"),
    }
}

#[test]
fn end_to_end_assembly_marks_physical_test_as_passing() {
    let mut bytes = wrap_record(0x01, &test_record_body_with_rcd());
    bytes.extend(wrap_record(0xAA, &[]));

    let records = parse_sss(&bytes).unwrap();
    let test_record = records
        .iter()
        .find_map(|r| match r {
            SssRecord::Test(t) => Some(t),
            _ => None,
        })
        .unwrap();

    let view = seaward_gar::assemble::assemble(test_record);
    // result_flags had neither pass nor fail, but a physical test ran.
    assert!(view.result.passed);
    assert!(!view.result.failed);
    assert_eq!(view.subtests.len(), 2);
    assert_eq!(view.subtests[0].test_type(), "visual");
    assert_eq!(view.subtests[1].test_type(), "rcd");
}
