use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kv3scan::{parse_path, Document, Path};

/// A collision document shaped like real `.vphys` output: one part whose
/// shape holds `hulls` hull dicts, each with an attribute index and a
/// vertex blob.
fn build_document(hulls: usize) -> String {
    let mut text = String::from("{\nm_parts = \n[\n{\nm_rnShape = \n{\nm_hulls = \n[\n");
    for i in 0..hulls {
        text.push_str("{\n");
        text.push_str(&format!("m_nCollisionAttributeIndex = {}\n", i % 4));
        text.push_str("m_Hull = \n{\nm_Vertices = \n#[\n");
        for chunk in 0..4 {
            text.push_str(&format!("{:08x} {:08x} {:08x}\n", i, chunk, i ^ chunk));
        }
        text.push_str("]\n}\n}\n");
    }
    text.push_str("]\n}\n}\n]\n}");
    text
}

fn hull_path(index: usize) -> Path {
    parse_path(&format!(
        "m_parts.0.m_rnShape.m_hulls.{index}.m_Hull.m_Vertices"
    ))
}

fn bench_search(c: &mut Criterion) {
    let text = build_document(1000);
    let last = hull_path(999);
    let first = hull_path(0);

    c.bench_function("parse_1000_hulls", |b| {
        b.iter(|| Document::parse(black_box(&text)).unwrap())
    });

    c.bench_function("search_last_cold", |b| {
        b.iter(|| {
            let doc = Document::parse(&text).unwrap();
            doc.search(black_box(&last)).unwrap().unwrap();
        })
    });

    let doc = Document::parse(&text).unwrap();
    doc.search(&last).unwrap().unwrap();
    c.bench_function("search_last_warm", |b| {
        b.iter(|| doc.search(black_box(&last)).unwrap().unwrap())
    });
    c.bench_function("search_first_warm", |b| {
        b.iter(|| doc.search(black_box(&first)).unwrap().unwrap())
    });

    c.bench_function("sequential_hull_walk", |b| {
        b.iter(|| {
            let doc = Document::parse(&text).unwrap();
            let mut found = 0usize;
            for index in 0usize.. {
                match doc.search(&hull_path(index)).unwrap() {
                    Some(value) => {
                        black_box(value.bytes().unwrap());
                        found += 1;
                    }
                    None => break,
                }
            }
            found
        })
    });
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
