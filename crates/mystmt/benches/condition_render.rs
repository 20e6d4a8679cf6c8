use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use mystmt::{ConditionTree, Conjunction, ParamList, Select, SqlStmt, StmtConfig, select_from};

/// Build a SELECT with `n` AND-ed bound comparisons:
/// SELECT * FROM t WHERE (`col0` = ? AND `col1` = ? ...)
fn build_select(n: usize) -> Select {
    (0..n).fold(select_from("t"), |stmt, i| {
        stmt.where_value(&format!("col{i}"), format!("v{i}"))
    })
}

/// Build an OR of `n` AND groups, each with two predicates.
fn build_tree(n: usize) -> ConditionTree {
    let mut tree = ConditionTree::new(Conjunction::Or);
    let root = tree.root();
    for i in 0..n {
        let group = tree.open_child(root, Conjunction::And, false);
        tree.add_value(group, "a", i as i64, "=");
        tree.add_value(group, "b", format!("v{i}"), "=");
    }
    tree
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("condition_render/select_build");

    for n in [1, 5, 10, 50, 100] {
        let stmt = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &stmt, |b, stmt| {
            b.iter(|| black_box(stmt.build()));
        });
    }

    group.finish();
}

fn bench_tree_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("condition_render/tree");
    let config = StmtConfig::default();

    for n in [1, 5, 20, 100] {
        let tree = build_tree(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &tree, |b, tree| {
            b.iter(|| {
                let mut params = ParamList::new();
                black_box(tree.render(tree.root(), &config, &mut params))
            });
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("condition_render/in_list");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let stmt = select_from("t").where_value("id", values.clone());
                black_box(stmt.build())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_tree_render, bench_in_list);
criterion_main!(benches);
