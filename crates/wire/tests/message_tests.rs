use std::net::{Ipv4Addr, Ipv6Addr};

use dnswire::dnssec::rdata::{SigInput, NSEC, RRSIG};
use dnswire::op::{Edns, Message, MessageType, Query, ResponseCode};
use dnswire::rr::rdata::{MX, NULL, OPT, SOA, TXT};
use dnswire::rr::{DNSClass, Name, RData, Record, RecordType};
use dnswire::{parse, write, DecodeError, ProtoErrorKind};

fn name(name: &str) -> Name {
    Name::from_ascii(name).unwrap()
}

fn www() -> Name {
    name("www.example.com.")
}

fn a_record(last: u8) -> Record {
    Record::from_rdata(www(), 300, RData::A(Ipv4Addr::new(192, 0, 2, last)))
}

fn response(answers: usize, authority: usize, additional: usize) -> Message {
    let mut message = Message::query(0xBEEF, Query::query(www(), RecordType::A));
    message
        .set_message_type(MessageType::Response)
        .add_answers((0..answers).map(|i| a_record(i as u8)))
        .add_name_servers((0..authority).map(|i| a_record(i as u8)))
        .add_additionals((0..additional).map(|i| a_record(i as u8)));
    message
}

// 12 bytes of header, "www.example.com" and its type and class
const QUESTION_END: usize = 12 + 17 + 4;
// a compressed owner, the fixed fields and an address
const A_RECORD_LEN: usize = 2 + 10 + 4;

#[test]
fn test_round_trip_full_response() {
    test_support::subscribe();

    let zone = name("example.com.");
    let mut message = Message::query(42, Query::query(www(), RecordType::ANY));
    message
        .set_message_type(MessageType::Response)
        .set_response_code(ResponseCode::NoError)
        .add_answer(a_record(1))
        .add_answer(Record::from_rdata(
            www(),
            300,
            RData::AAAA(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1)),
        ))
        .add_answer(Record::from_rdata(
            www(),
            300,
            RData::MX(MX::new(10, name("mail.example.com."))),
        ))
        .add_answer(Record::from_rdata(
            www(),
            300,
            RData::TXT(TXT::new(vec!["v=spf1 -all".to_string(), String::new()])),
        ))
        .add_name_server(Record::from_rdata(
            zone.clone(),
            3600,
            RData::SOA(SOA::new(
                name("ns1.example.com."),
                name("hostmaster.example.com."),
                2024_01_01,
                7200,
                3600,
                1_209_600,
                300,
            )),
        ))
        .add_name_server(Record::from_rdata(
            zone,
            3600,
            RData::NS(name("ns1.example.com.")),
        ))
        .add_additional(Record::from_rdata(
            name("ns1.example.com."),
            3600,
            RData::A(Ipv4Addr::new(198, 51, 100, 53)),
        ));

    let bytes = message.to_vec().unwrap();
    assert_eq!(&bytes[4..12], &[0, 1, 0, 4, 0, 2, 0, 1]);

    let parsed = parse(&bytes).unwrap();
    assert_eq!(parsed, message);
    assert!(!parsed.truncated());
    assert_eq!(parsed.to_vec().unwrap(), bytes);
}

#[test]
fn test_owner_and_rdata_compression() {
    test_support::subscribe();

    let mut message = response(0, 0, 0);
    message.add_answer(Record::from_rdata(
        www(),
        300,
        RData::MX(MX::new(10, name("mail.example.com."))),
    ));

    let bytes = message.to_vec().unwrap();
    // owner points at the question name
    assert_eq!(&bytes[QUESTION_END..QUESTION_END + 2], &[0xC0, 0x0C]);
    // preference, "mail" and a pointer to example.com at 16
    let rdata = QUESTION_END + 12;
    assert_eq!(&bytes[rdata - 2..rdata], &[0, 9]);
    assert_eq!(&bytes[rdata + 2..rdata + 7], b"\x04mail");
    assert_eq!(&bytes[rdata + 7..rdata + 9], &[0xC0, 16]);

    assert_eq!(parse(&bytes).unwrap(), message);
}

#[test]
fn test_rrsig_signer_is_canonical() {
    test_support::subscribe();

    let input = SigInput {
        type_covered: RecordType::A,
        algorithm: 13,
        num_labels: 3,
        original_ttl: 300,
        sig_expiration: 1_700_086_400,
        sig_inception: 1_700_000_000,
        key_tag: 12345,
        signer_name: name("example.com."),
    };
    let mut message = response(0, 0, 0);
    message.add_answer(Record::from_rdata(
        www(),
        300,
        RData::RRSIG(RRSIG::new(input, vec![1, 2, 3, 4])),
    ));

    let bytes = message.to_vec().unwrap();
    let rdata = QUESTION_END + 12;
    // fixed fields, the uncompressed signer and the signature
    assert_eq!(&bytes[rdata - 2..rdata], &[0, 18 + 13 + 4]);
    assert_eq!(&bytes[rdata + 18..rdata + 31], b"\x07example\x03com\x00");
    assert_eq!(&bytes[rdata + 31..], &[1, 2, 3, 4]);

    assert_eq!(parse(&bytes).unwrap(), message);
}

#[test]
fn test_nsec_owner_and_bit_maps() {
    test_support::subscribe();

    let types = [
        RecordType::A,
        RecordType::MX,
        RecordType::RRSIG,
        RecordType::NSEC,
        RecordType::Unknown(1234),
    ];
    let mut message = response(0, 0, 0);
    message.add_answer(Record::from_rdata(
        www(),
        3600,
        RData::NSEC(NSEC::new(name("zzz.example.com."), types)),
    ));

    let bytes = message.to_vec().unwrap();
    // the owner is written in full even though the question holds the same name
    assert_eq!(
        &bytes[QUESTION_END..QUESTION_END + 17],
        b"\x03www\x07example\x03com\x00"
    );
    assert_eq!(&bytes[QUESTION_END + 17..QUESTION_END + 19], &[0, 47]);

    let parsed = parse(&bytes).unwrap();
    assert_eq!(parsed, message);
    let nsec = parsed.answers()[0].data().unwrap().as_nsec().unwrap();
    assert_eq!(nsec.type_bit_maps().collect::<Vec<_>>(), types.to_vec());
}

#[test]
fn test_truncate_additional_at_512() {
    test_support::subscribe();

    let message = response(0, 0, 40);
    let mut buffer = [0_u8; 512];
    let len = write(&mut buffer, &message).unwrap();

    let fits = (512 - QUESTION_END) / A_RECORD_LEN;
    assert_eq!(len, QUESTION_END + fits * A_RECORD_LEN);

    let parsed = parse(&buffer[..len]).unwrap();
    assert!(parsed.truncated());
    assert_eq!(parsed.additionals().len(), fits);
    assert_eq!(parsed.additionals(), &message.additionals()[..fits]);
}

#[test]
fn test_truncation_drops_later_sections() {
    test_support::subscribe();

    let message = response(2, 40, 3);
    let mut buffer = [0_u8; 512];
    let len = write(&mut buffer, &message).unwrap();

    let fits = (512 - QUESTION_END - 2 * A_RECORD_LEN) / A_RECORD_LEN;
    assert_eq!(&buffer[4..12], &[0, 1, 0, 2, 0, fits as u8, 0, 0]);

    let parsed = parse(&buffer[..len]).unwrap();
    assert!(parsed.truncated());
    assert_eq!(parsed.answers().len(), 2);
    assert_eq!(parsed.name_servers().len(), fits);
    assert!(parsed.additionals().is_empty());
}

#[test]
fn test_truncate_answers_at_512() {
    test_support::subscribe();

    let message = response(40, 3, 3);
    let mut buffer = [0_u8; 512];
    let len = write(&mut buffer, &message).unwrap();

    let fits = (512 - QUESTION_END) / A_RECORD_LEN;
    assert_eq!(len, QUESTION_END + fits * A_RECORD_LEN);
    assert_eq!(buffer[2] & 0x02, 0x02);
    assert_eq!(&buffer[4..12], &[0, 1, 0, fits as u8, 0, 0, 0, 0]);

    let parsed = parse(&buffer[..len]).unwrap();
    assert!(parsed.truncated());
    assert_eq!(parsed.answers(), &message.answers()[..fits]);
    assert!(parsed.name_servers().is_empty());
    assert!(parsed.additionals().is_empty());
}

#[test]
fn test_everything_fits_without_truncation() {
    let message = response(2, 2, 2);
    let mut buffer = [0_u8; 512];
    let len = write(&mut buffer, &message).unwrap();

    assert_eq!(len, QUESTION_END + 6 * A_RECORD_LEN);
    assert!(!parse(&buffer[..len]).unwrap().truncated());
}

#[test]
fn test_edns_folding() {
    test_support::subscribe();

    let mut message = Message::query(1, Query::query(www(), RecordType::A));
    let mut edns = Edns::new();
    edns.set_max_payload(4096).set_dnssec_ok(true);
    message.set_edns(edns);

    let bytes = message.to_vec().unwrap();
    assert_eq!(&bytes[10..12], &[0, 1]);
    #[rustfmt::skip]
    assert_eq!(
        &bytes[QUESTION_END..],
        &[
            0, // root owner
            0, 41, // OPT
            0x10, 0x00, // payload size
            0, 0, 0x80, 0x00, // rcode high, version, DO
            0, 0, // no options
        ]
    );

    let parsed = parse(&bytes).unwrap();
    let edns = parsed.edns().unwrap();
    assert!(edns.dnssec_ok());
    assert_eq!(edns.max_payload(), 4096);
    assert_eq!(edns.version(), 0);
    assert_eq!(parsed.additionals()[0].record_type(), RecordType::OPT);
    assert_eq!(parsed.additionals()[0].dns_class(), DNSClass::Unknown(4096));
}

#[test]
fn test_single_question() {
    test_support::subscribe();

    let mut message = Message::new();
    message.set_id(9);
    assert!(matches!(
        write(&mut [0; 512], &message).unwrap_err().kind(),
        ProtoErrorKind::QuestionCount(0)
    ));

    let mut bytes = response(0, 0, 0).to_vec().unwrap();
    bytes[5] = 0;
    assert_eq!(
        parse(&bytes).unwrap_err().as_decode(),
        Some(&DecodeError::QuestionCount(0))
    );
}

#[test]
fn test_missing_rdata() {
    let mut message = response(0, 0, 0);
    message.add_answer(Record::with(www(), RecordType::MX, 300));

    let err = message.to_vec().unwrap_err();
    assert_eq!(err.to_string(), "MX record requires \"priority\"");
}

#[test]
fn test_rdata_length_mismatch() {
    test_support::subscribe();

    let mut bytes = response(1, 0, 0).to_vec().unwrap();
    let rd_length = QUESTION_END + 10;
    bytes[rd_length + 1] = 5;
    bytes.push(0);

    assert!(matches!(
        parse(&bytes).unwrap_err().as_decode(),
        Some(DecodeError::IncorrectRDataLengthRead { read: 4, len: 5, .. })
    ));

    bytes.pop();
    bytes[rd_length + 1] = 9;
    assert!(matches!(
        parse(&bytes).unwrap_err().as_decode(),
        Some(DecodeError::RDataLengthExceedsMessage { len: 9, .. })
    ));
}

#[test]
fn test_empty_rdata_unknown_type() {
    test_support::subscribe();

    let mut message = response(0, 0, 0);
    message.add_answer(Record::from_rdata(
        www(),
        300,
        RData::Unknown {
            code: RecordType::Unknown(65280),
            rdata: NULL::new(),
        },
    ));

    let bytes = message.to_vec().unwrap();
    assert_eq!(&bytes[bytes.len() - 2..], &[0, 0]);
    assert_eq!(parse(&bytes).unwrap(), message);
}

#[test]
fn test_empty_rdata_opt() {
    test_support::subscribe();

    let mut opt = Record::from_rdata(Name::root(), 0, RData::OPT(OPT::default()));
    opt.set_dns_class(DNSClass::from(1232));
    let mut message = response(0, 0, 0);
    message.add_additional(opt.clone());

    let bytes = message.to_vec().unwrap();
    assert_eq!(&bytes[10..12], &[0, 1]);
    assert_eq!(&bytes[bytes.len() - 2..], &[0, 0]);

    let parsed = parse(&bytes).unwrap();
    assert_eq!(parsed.additionals(), &[opt]);
    assert_eq!(parsed.edns().unwrap().max_payload(), 1232);
    assert!(parsed.edns().unwrap().options().options().is_empty());
}

#[test]
fn test_empty_rdata_fixed_layout_rejected() {
    test_support::subscribe();

    let mut bytes = response(1, 0, 0).to_vec().unwrap();
    let rd_length = QUESTION_END + 10;
    bytes[rd_length + 1] = 0;

    // the address is read anyway and overruns the empty rdata
    assert!(matches!(
        parse(&bytes).unwrap_err().as_decode(),
        Some(DecodeError::IncorrectRDataLengthRead { read: 4, len: 0, .. })
    ));

    bytes.truncate(rd_length + 2);
    assert_eq!(
        parse(&bytes).unwrap_err().as_decode(),
        Some(&DecodeError::InsufficientBytes)
    );
}

#[test]
fn test_pointer_loop_rejected() {
    test_support::subscribe();

    #[rustfmt::skip]
    let bytes = [
        0, 1, 0x01, 0x00, 0, 1, 0, 0, 0, 0, 0, 0,
        0xC0, 0x0C, // the question name points at itself
        0, 1, 0, 1,
    ];
    assert!(matches!(
        parse(&bytes).unwrap_err().as_decode(),
        Some(DecodeError::PointerNotPriorToLabel { idx: 12, .. })
    ));

    #[rustfmt::skip]
    let bytes = [
        0, 1, 0x01, 0x00, 0, 1, 0, 0, 0, 0, 0, 0,
        0x01, b'a', 0xC0, 0x0E, // a pointer forward to itself
        0, 1, 0, 1,
    ];
    assert!(parse(&bytes).is_err());
}

#[test]
fn test_truncated_input() {
    let bytes = response(1, 0, 0).to_vec().unwrap();
    for len in 0..bytes.len() {
        assert!(parse(&bytes[..len]).is_err(), "parsed {len} bytes");
    }
}

#[cfg(feature = "serde")]
#[test]
fn test_record_from_toml() {
    let record: Record = toml::from_str(
        r#"
        name_labels = "www.example.com."
        rr_type = "A"
        dns_class = "IN"
        ttl = 300

        [rdata]
        A = "192.0.2.1"
        "#,
    )
    .unwrap();
    assert_eq!(record, a_record(1));

    let mut message = response(0, 0, 0);
    message.add_answer(record);
    assert_eq!(parse(&message.to_vec().unwrap()).unwrap(), message);
}

#[cfg(feature = "serde")]
#[test]
fn test_message_from_toml() {
    test_support::subscribe();

    let message: Message = toml::from_str(
        r#"
        name_servers = []
        additionals = []

        [header]
        id = 7
        message_type = "Response"
        op_code = "Query"
        authoritative = true
        truncation = false
        recursion_desired = true
        recursion_available = true
        z = false
        authentic_data = false
        checking_disabled = false
        response_code = "NoError"

        [[queries]]
        name = "www.example.com."
        query_type = "A"
        query_class = "IN"

        [[answers]]
        name_labels = "www.example.com."
        rr_type = "A"
        dns_class = "IN"
        ttl = 300

        [answers.rdata]
        A = "192.0.2.1"
        "#,
    )
    .unwrap();

    assert_eq!(message.id(), 7);
    assert!(message.header().authoritative());
    assert_eq!(message.answers(), &[a_record(1)]);
    assert!(message.edns().is_none());

    let bytes = message.to_vec().unwrap();
    assert_eq!(&bytes[..4], &[0, 7, 0x85, 0x80]);
    assert_eq!(parse(&bytes).unwrap(), message);
}
