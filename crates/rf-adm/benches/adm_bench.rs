//! ADM identifier and document benchmarks

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rf_adm::{
    AdmResult, AudioBlockFormatId, AudioContent, AudioProgramme, Document, ElementId, Time,
    create_simple_object, reassign_ids, update_block_format_durations,
};

fn bench_id_parse(c: &mut Criterion) {
    c.bench_function("parse_block_format_id", |b| {
        b.iter(|| black_box(AudioBlockFormatId::parse(black_box("AB_00031001_0000000a"))))
    });
}

fn build_document(objects: usize) -> AdmResult<Document> {
    let mut doc = Document::new();
    let programme = doc.add(AudioProgramme::new("Main"))?;
    let content = doc.add(AudioContent::new("Content"))?;
    doc.add_reference(programme, content)?;
    for i in 0..objects {
        let holder = create_simple_object(&mut doc, &format!("Object {i}"))?;
        doc.add_reference(content, holder.audio_object)?;
    }
    Ok(doc)
}

fn bench_build_document(c: &mut Criterion) {
    c.bench_function("build_document_64_objects", |b| {
        b.iter(|| black_box(build_document(black_box(64))))
    });
}

fn bench_reassign_ids(c: &mut Criterion) {
    let doc = build_document(64).unwrap();
    c.bench_function("reassign_ids_64_objects", |b| {
        b.iter(|| {
            let mut copy = doc.deep_copy();
            black_box(reassign_ids(&mut copy)).unwrap();
            black_box(copy)
        })
    });
}

fn bench_block_durations(c: &mut Criterion) {
    let doc = build_document(64).unwrap();
    c.bench_function("block_durations_64_objects", |b| {
        b.iter(|| {
            let mut copy = doc.deep_copy();
            black_box(update_block_format_durations(&mut copy, Time::from_secs(60))).unwrap();
            black_box(copy)
        })
    });
}

criterion_group!(
    benches,
    bench_id_parse,
    bench_build_document,
    bench_reassign_ids,
    bench_block_durations
);
criterion_main!(benches);
