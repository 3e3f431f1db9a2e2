//! XML codec tests over the public API
//!
//! - documents written and read back keep elements, parameters and edges
//! - lenient and strict handling of unknown markup
//! - ITU wrapper, default values, files and serial frames

use approx::assert_relative_eq;
use rf_adm::elements::block_formats::{AudioBlockFormatObjects, BlockFormat, Width};
use rf_adm::{
    AdmError, AudioChannelFormat, AudioContent, AudioObject, AudioPackFormat, AudioProgramme,
    AudioStreamFormat, AudioTrackFormat, AudioTrackUid, Azimuth, ContentKind, DialogueId,
    Document, Duration, Elevation, ElementId, Gain, Importance, Label, Mute, Parameters, Rtime,
    SampleRate, SphericalPosition, Start, Time, create_simple_object,
};
use rf_adm_xml::{
    ParserOptions, WriterOptions, XmlError, parse_document, parse_frame, read_document_file,
    write_document, write_document_file, write_frame,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn strict() -> ParserOptions {
    ParserOptions {
        strict: true,
        ..ParserOptions::default()
    }
}

/// Programme → content → object chain with two timed blocks
fn sample_document() -> Document {
    let mut document = Document::new();
    let holder = create_simple_object(&mut document, "Voice").unwrap();

    let programme = document.add(AudioProgramme::new("Main")).unwrap();
    let content = document.add(AudioContent::new("Dialogue")).unwrap();
    document.add_reference(programme, content).unwrap();
    document.add_reference(content, holder.audio_object).unwrap();

    {
        let mut content = document.get_mut(content).unwrap();
        content.set(ContentKind::undefined(DialogueId::DIALOGUE)).unwrap();
        content.add(Label::new("Dialog").with_language("en"));
    }
    {
        let mut object = document.get_mut(holder.audio_object).unwrap();
        object.set(Gain::db(-3.0)).unwrap();
        object.set(Importance::new(8).unwrap()).unwrap();
        object.set(Start::new(Time::from_secs(1)).unwrap()).unwrap();
    }
    {
        let mut channel = document.get_mut(holder.audio_channel_format).unwrap();
        let mut block = AudioBlockFormatObjects::new(SphericalPosition::new(
            Azimuth::new(-30.0).unwrap(),
            Elevation::new(15.0).unwrap(),
        ));
        block.set(Rtime::new(Time::from_millis(500)).unwrap()).unwrap();
        block.set(Duration::new(Time::from_millis(500)).unwrap()).unwrap();
        block.set(Width::new(20.0).unwrap()).unwrap();
        channel.add_block_format(block).unwrap();
    }
    document
        .get_mut(holder.audio_track_uid)
        .unwrap()
        .set(SampleRate::new(48_000).unwrap())
        .unwrap();
    document
}

// ═══════════════════════════════════════════════════════════════════════════════
// ROUND TRIPS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_document_round_trip_keeps_elements() {
    init_logging();
    let document = sample_document();
    let xml = write_document(&document, &WriterOptions::default());
    let parsed = parse_document(&xml, &strict()).unwrap();

    assert_eq!(parsed.len::<AudioProgramme>(), 1);
    assert_eq!(parsed.len::<AudioContent>(), 1);
    assert_eq!(parsed.len::<AudioObject>(), 1);
    assert_eq!(parsed.len::<AudioPackFormat>(), 1);
    assert_eq!(parsed.len::<AudioChannelFormat>(), 1);
    assert_eq!(parsed.len::<AudioStreamFormat>(), 1);
    assert_eq!(parsed.len::<AudioTrackFormat>(), 1);
    assert_eq!(parsed.len::<AudioTrackUid>(), 1);

    // writing again gives the same text
    assert_eq!(write_document(&parsed, &WriterOptions::default()), xml);
}

#[test]
fn test_round_trip_keeps_parameters() {
    let xml = write_document(&sample_document(), &WriterOptions::default());
    let parsed = parse_document(&xml, &ParserOptions::default()).unwrap();

    let (_, object) = parsed.iter::<AudioObject>().next().unwrap();
    assert_eq!(object.name(), "Voice");
    assert_eq!(object.get::<Gain>(), Gain::db(-3.0));
    assert_eq!(object.get::<Importance>().get(), 8);
    assert_eq!(object.get::<Start>().get(), Time::from_secs(1));
    assert!(object.is_default::<Mute>());

    let (_, content) = parsed.iter::<AudioContent>().next().unwrap();
    assert_eq!(content.get::<ContentKind>().dialogue_id(), DialogueId::DIALOGUE);
    assert_eq!(content.get::<Vec<Label>>()[0].language.as_ref().map(|l| l.get()), Some("en"));

    let (_, uid) = parsed.iter::<AudioTrackUid>().next().unwrap();
    assert_eq!(uid.get::<SampleRate>().get(), 48_000);
}

#[test]
fn test_round_trip_keeps_blocks() {
    let xml = write_document(&sample_document(), &WriterOptions::default());
    let parsed = parse_document(&xml, &ParserOptions::default()).unwrap();

    let (_, channel) = parsed.iter::<AudioChannelFormat>().next().unwrap();
    let blocks = channel.block_formats::<AudioBlockFormatObjects>();
    assert_eq!(blocks.len(), 2);
    assert!(blocks[0].is_default::<Rtime>());
    assert_eq!(blocks[1].get::<Rtime>().get(), Time::from_millis(500));
    assert_eq!(blocks[1].id().format(), format!("{}_00000002", &blocks[0].id().format()[..11]));

    let position = blocks[1].get::<SphericalPosition>();
    assert_relative_eq!(position.azimuth.get(), -30.0);
    assert_relative_eq!(position.elevation.get(), 15.0);
    assert_relative_eq!(blocks[1].get::<Width>().get(), 20.0);
}

#[test]
fn test_round_trip_keeps_references() {
    let xml = write_document(&sample_document(), &WriterOptions::default());
    let parsed = parse_document(&xml, &ParserOptions::default()).unwrap();

    let (programme, _) = parsed.iter::<AudioProgramme>().next().unwrap();
    let contents = parsed.references::<AudioContent>(programme).unwrap();
    let objects = parsed.references::<AudioObject>(contents[0]).unwrap();
    let packs = parsed.references::<AudioPackFormat>(objects[0]).unwrap();
    let channels = parsed.references::<AudioChannelFormat>(packs[0]).unwrap();
    assert_eq!(channels.len(), 1);

    let uids = parsed.references::<AudioTrackUid>(objects[0]).unwrap();
    let track = parsed.reference::<AudioTrackFormat>(uids[0]).unwrap().unwrap();
    let stream = parsed.reference::<AudioStreamFormat>(track).unwrap().unwrap();
    assert_eq!(parsed.reference::<AudioChannelFormat>(stream).unwrap(), Some(channels[0]));
    assert_eq!(parsed.references::<AudioTrackFormat>(stream).unwrap(), vec![track]);
}

// ═══════════════════════════════════════════════════════════════════════════════
// WRITER OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_itu_structure_reads_back() {
    let options = WriterOptions {
        itu_structure: true,
        ..WriterOptions::default()
    };
    let xml = write_document(&sample_document(), &options);
    assert!(xml.contains("<ebuCoreMain"));

    let parsed = parse_document(&xml, &ParserOptions::default()).unwrap();
    assert_eq!(parsed.len::<AudioObject>(), 1);
}

#[test]
fn test_default_values_only_on_request() {
    let document = sample_document();
    let plain = write_document(&document, &WriterOptions::default());
    assert!(!plain.contains("<mute>"));

    let verbose = write_document(
        &document,
        &WriterOptions {
            write_default_values: true,
            ..WriterOptions::default()
        },
    );
    assert!(verbose.contains("<mute>0</mute>"));
    assert!(verbose.contains("<headLocked>0</headLocked>"));

    // defaults read back as explicit values
    let parsed = parse_document(&verbose, &ParserOptions::default()).unwrap();
    let (_, object) = parsed.iter::<AudioObject>().next().unwrap();
    assert!(!object.is_default::<Mute>());
    assert!(!object.get::<Mute>().get());
}

#[test]
fn test_compact_output() {
    let xml = write_document(
        &sample_document(),
        &WriterOptions {
            indent: 0,
            ..WriterOptions::default()
        },
    );
    assert!(!xml.contains('\n'));
    assert!(parse_document(&xml, &ParserOptions::default()).is_ok());
}

// ═══════════════════════════════════════════════════════════════════════════════
// READER BEHAVIOUR
// ═══════════════════════════════════════════════════════════════════════════════

const UNKNOWN_MARKUP: &str = r#"<audioFormatExtended>
  <audioObject audioObjectID="AO_1001" audioObjectName="Voice" colour="red">
    <sparkle>1</sparkle>
  </audioObject>
</audioFormatExtended>"#;

#[test]
fn test_unknown_markup_lenient() {
    init_logging();
    let parsed = parse_document(UNKNOWN_MARKUP, &ParserOptions::default()).unwrap();
    assert_eq!(parsed.len::<AudioObject>(), 1);
}

#[test]
fn test_unknown_markup_strict() {
    assert!(matches!(
        parse_document(UNKNOWN_MARKUP, &strict()),
        Err(XmlError::UnexpectedAttribute { .. })
    ));
}

#[test]
fn test_unresolved_reference_is_error() {
    let xml = r#"<audioFormatExtended>
      <audioPackFormat audioPackFormatID="AP_00031001" audioPackFormatName="P" typeLabel="0003">
        <audioChannelFormatIDRef>AC_00031001</audioChannelFormatIDRef>
      </audioPackFormat>
    </audioFormatExtended>"#;
    assert!(matches!(
        parse_document(xml, &ParserOptions::default()),
        Err(XmlError::UnresolvedReference { .. })
    ));
}

#[test]
fn test_duplicate_id_is_error() {
    let xml = r#"<audioFormatExtended>
      <audioObject audioObjectID="AO_1001" audioObjectName="A"/>
      <audioObject audioObjectID="AO_1001" audioObjectName="B"/>
    </audioFormatExtended>"#;
    assert!(matches!(
        parse_document(xml, &ParserOptions::default()),
        Err(XmlError::Adm(_))
    ));
}

#[test]
fn test_malformed_xml() {
    assert!(matches!(
        parse_document("<audioFormatExtended>", &ParserOptions::default()),
        Err(XmlError::Xml(_))
    ));
}

#[test]
fn test_oversized_timecode_is_error() {
    let xml = r#"<audioFormatExtended>
      <audioObject audioObjectID="AO_1001" audioObjectName="A" start="9999999:00:00.00000"/>
    </audioFormatExtended>"#;
    assert!(matches!(
        parse_document(xml, &ParserOptions::default()),
        Err(XmlError::Adm(AdmError::Parse { .. }))
    ));

    let frame = r#"<frame>
      <frameHeader>
        <frameFormat frameFormatID="FF_00000001" start="00:00:00.00000"
            duration="99999999999:00:00.1S999999999" type="full"/>
      </frameHeader>
    </frame>"#;
    assert!(matches!(
        parse_frame(frame, &ParserOptions::default()),
        Err(XmlError::Adm(AdmError::Parse { .. }))
    ));
}

#[test]
fn test_object_cycle_is_rejected() {
    let xml = r#"<audioFormatExtended>
      <audioObject audioObjectID="AO_1001" audioObjectName="A">
        <audioObjectIDRef>AO_1002</audioObjectIDRef>
      </audioObject>
      <audioObject audioObjectID="AO_1002" audioObjectName="B">
        <audioObjectIDRef>AO_1001</audioObjectIDRef>
      </audioObject>
    </audioFormatExtended>"#;
    assert!(matches!(
        parse_document(xml, &ParserOptions::default()),
        Err(XmlError::Adm(_))
    ));
}

// ═══════════════════════════════════════════════════════════════════════════════
// FILES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_document_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.xml");

    write_document_file(&sample_document(), &path, &WriterOptions::default()).unwrap();
    let parsed = read_document_file(&path, &ParserOptions::default()).unwrap();
    assert_eq!(parsed.len::<AudioChannelFormat>(), 1);

    assert!(matches!(
        read_document_file(dir.path().join("missing.xml"), &ParserOptions::default()),
        Err(XmlError::Io(_))
    ));
}

#[test]
fn test_options_persistence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("writer.json");

    let options = WriterOptions {
        itu_structure: true,
        indent: 4,
        ..WriterOptions::default()
    };
    options.save_to(&path).unwrap();
    assert_eq!(WriterOptions::load_from(&path), options);

    // partial files fill in defaults
    std::fs::write(&path, r#"{ "strict": true }"#).unwrap();
    let parser = ParserOptions::load_from(&path);
    assert!(parser.strict);
    assert!(!parser.recursive_node_search);
}

// ═══════════════════════════════════════════════════════════════════════════════
// FRAMES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_frame_carries_document() {
    let xml = r#"<frame>
      <frameHeader>
        <frameFormat frameFormatID="FF_00000002" start="00:00:00.50000"
            duration="00:00:00.50000" type="divided" timeReference="local"/>
      </frameHeader>
      <audioFormatExtended>
        <audioObject audioObjectID="AO_1001" audioObjectName="Voice">
          <gain gainUnit="dB">-6</gain>
        </audioObject>
      </audioFormatExtended>
    </frame>"#;
    let frame = parse_frame(xml, &ParserOptions::default()).unwrap();
    let (_, object) = frame.document().iter::<AudioObject>().next().unwrap();
    assert_eq!(object.get::<Gain>(), Gain::db(-6.0));

    let written = write_frame(&frame, &WriterOptions::default());
    assert!(written.contains("timeReference=\"local\""));
    let again = parse_frame(&written, &strict()).unwrap();
    assert_eq!(again.header(), frame.header());
    assert_eq!(again.document().len::<AudioObject>(), 1);
}
