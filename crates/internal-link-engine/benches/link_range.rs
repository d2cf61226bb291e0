use criterion::{Criterion, criterion_group, criterion_main};
use internal_link_engine::{Editor, ModelSelection, Position, find_link_range};
mod common;

fn bench_find_link_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_link_range");
    group.sample_size(10);

    for pieces in [10, 1_000] {
        let mut editor = Editor::default();
        editor
            .set_data(&common::generate_fragmented_link(pieces))
            .unwrap();
        let middle = editor.model().element_at(&[0]).unwrap().max_offset() / 2;
        let position = Position::in_block(0, middle);

        group.bench_function(format!("{pieces}_nodes"), |b| {
            b.iter(|| {
                std::hint::black_box(find_link_range(
                    editor.model(),
                    std::hint::black_box(&position),
                    "bench",
                ));
            });
        });
    }

    group.finish();
}

fn bench_render_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_cycle");
    group.sample_size(10);

    let mut editor = Editor::default();
    editor
        .set_data(&common::generate_linked_paragraphs(200))
        .unwrap();

    group.bench_function("move_into_link", |b| {
        let mut offset = 0;
        b.iter(|| {
            offset = (offset + 1) % 20;
            editor
                .set_selection(ModelSelection::collapsed(Position::in_block(100, offset)))
                .unwrap();
            std::hint::black_box(editor.highlighted_links());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_find_link_range, bench_render_cycle);
criterion_main!(benches);
