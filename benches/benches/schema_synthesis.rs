use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use graphql_schema::{
    expand_types, selection_set, ExpansionMode, Field, InputValue, Schema, SelectionOptions,
    Type, TypeKind, TypeRef,
};
use std::hint::black_box;

const NODE_COUNT: usize = 200;

fn field(name: &str, type_ref: TypeRef) -> Field {
    Field {
        name: name.to_string(),
        description: None,
        args: Vec::new(),
        type_ref,
        is_deprecated: false,
        deprecation_reason: None,
    }
}

fn node_name(i: usize) -> String {
    format!("Node{i}")
}

/// A ring of object types, each linking to its two successors, all
/// implementing the `Entity` interface.
fn build_schema(nodes: usize) -> Schema {
    let mut types = Vec::with_capacity(nodes + 4);

    let mut query = Type::new("Query", TypeKind::Object);
    query.fields.push(field(
        "entities",
        TypeRef::non_null(TypeRef::list(TypeRef::named(TypeKind::Interface, "Entity"))),
    ));
    let mut by_id = field("node", TypeRef::named(TypeKind::Object, node_name(0)));
    by_id.args.push(InputValue {
        name: "id".to_string(),
        description: None,
        type_ref: TypeRef::non_null(TypeRef::named(TypeKind::Scalar, "ID")),
        default_value: None,
    });
    query.fields.push(by_id);
    types.push(query);

    let mut entity = Type::new("Entity", TypeKind::Interface);
    entity.fields.push(field("id", TypeRef::named(TypeKind::Scalar, "ID")));
    for i in 0..nodes {
        entity
            .possible_types
            .push(TypeRef::named(TypeKind::Object, node_name(i)));
    }
    types.push(entity);

    for i in 0..nodes {
        let mut node = Type::new(node_name(i), TypeKind::Object);
        node.interfaces
            .push(TypeRef::named(TypeKind::Interface, "Entity"));
        node.fields.push(field("id", TypeRef::named(TypeKind::Scalar, "ID")));
        node.fields.push(field("label", TypeRef::named(TypeKind::Scalar, "String")));
        node.fields.push(field(
            "next",
            TypeRef::named(TypeKind::Object, node_name((i + 1) % nodes)),
        ));
        node.fields.push(field(
            "skip",
            TypeRef::list(TypeRef::named(TypeKind::Object, node_name((i + 2) % nodes))),
        ));
        types.push(node);
    }

    types.push(Type::new("ID", TypeKind::Scalar));
    types.push(Type::new("String", TypeKind::Scalar));
    Schema::from_types(types)
}

fn bench_schema_construction(c: &mut Criterion) {
    c.bench_function("schema_construction", |b| {
        b.iter_batched(
            || {
                let schema = build_schema(NODE_COUNT);
                schema.types().to_vec()
            },
            |types| black_box(Schema::from_types(types)),
            BatchSize::SmallInput,
        );
    });
}

fn bench_expansion(c: &mut Criterion) {
    let schema = build_schema(NODE_COUNT);
    let mut group = c.benchmark_group("expand_types");

    for mode in [ExpansionMode::SingleHop, ExpansionMode::Transitive] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{mode:?}")),
            &mode,
            |b, &mode| {
                b.iter(|| black_box(expand_types(&schema, ["Query"], mode)));
            },
        );
    }
    group.finish();
}

fn bench_selection_set(c: &mut Criterion) {
    let schema = build_schema(NODE_COUNT);
    let Ok(node) = schema.lookup_type_by_name("Node0") else {
        return;
    };
    let mut group = c.benchmark_group("selection_set");

    for max_depth in [1_usize, 2, 4, 6] {
        let options = SelectionOptions::new(max_depth);
        group.bench_with_input(
            BenchmarkId::from_parameter(max_depth),
            &options,
            |b, options| {
                b.iter(|| black_box(selection_set(&schema, node, options)));
            },
        );
    }
    group.finish();
}

fn bench_interface_fragments(c: &mut Criterion) {
    let schema = build_schema(NODE_COUNT);
    let Ok(entity) = schema.lookup_type_by_name("Entity") else {
        return;
    };
    let options = SelectionOptions::new(2);

    c.bench_function("selection_set_interface_fragments", |b| {
        b.iter(|| black_box(selection_set(&schema, entity, &options)));
    });
}

criterion_group!(
    benches,
    bench_schema_construction,
    bench_expansion,
    bench_selection_set,
    bench_interface_fragments
);
criterion_main!(benches);
