// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use trellis_collection::{Collection, ItemData, Registration};
use trellis_dom::mock::{MockDocument, MockElement};

struct Fixture {
    _doc: MockDocument,
    collection: Collection,
    elements: Vec<Rc<MockElement>>,
    _registrations: Vec<Registration>,
}

/// `len` items appended to one container, registered in reverse order so
/// every read has to sort.
fn fixture(len: usize, every_nth_disabled: usize) -> Fixture {
    let doc = MockDocument::new();
    let container = doc.create_element("ul");
    doc.append(None, &container);
    let collection = Collection::new();
    collection.set_container(Some(&container.handle()));

    let elements: Vec<_> = (0..len)
        .map(|_| {
            let el = doc.create_element("li");
            doc.append(Some(&container), &el);
            el
        })
        .collect();
    let registrations = elements
        .iter()
        .enumerate()
        .rev()
        .map(|(i, el)| {
            let disabled = every_nth_disabled != 0 && i % every_nth_disabled == 0;
            collection.register(ItemData::new(format!("item-{i}"), &el.handle()).with_disabled(move || disabled))
        })
        .collect();

    Fixture {
        _doc: doc,
        collection,
        elements,
        _registrations: registrations,
    }
}

fn bench_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection/ordering");

    for len in [16usize, 128, 1_024] {
        let f = fixture(len, 0);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_function(BenchmarkId::new("items", len), |b| {
            b.iter(|| black_box(f.collection.items()));
        });

        let g = fixture(len, 4);
        group.bench_function(BenchmarkId::new("enabled_elements", len), |b| {
            b.iter(|| black_box(g.collection.enabled_elements()));
        });
    }

    group.finish();
}

fn bench_index_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection/enabled_index_of");

    for len in [16usize, 128, 1_024] {
        let f = fixture(len, 0);
        let last = f.elements[len - 1].handle();
        group.bench_function(BenchmarkId::new("last", len), |b| {
            b.iter(|| black_box(f.collection.enabled_index_of(&last)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ordering, bench_index_lookup);
criterion_main!(benches);
