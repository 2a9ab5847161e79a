use chainscope_api::{ReferenceIndex, ReferenceKind, ResolutionContext, TypeName};
use chainscope_core::Snapshot;
use std::path::Path;
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
struct ProducerRow {
    #[tabled(rename = "Operation")]
    operation: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Occurrences")]
    count: u64,
}

pub fn run(path: &Path, ty: &str) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = Snapshot::from_json_file(path)?;
    let index = snapshot.index();
    let context = snapshot.context();
    let ty = TypeName::new(ty);

    println!("Type:      {}", ty);
    println!("Reachable: {}", context.is_reachable(&ty));
    let supertypes: Vec<String> = context
        .supertypes_of(&ty)
        .into_iter()
        .skip(1)
        .map(|t| t.to_string())
        .collect();
    if !supertypes.is_empty() {
        println!("Extends:   {}", supertypes.join(", "));
    }

    let mut rows = Vec::new();
    for kind in [
        ReferenceKind::ZeroDim,
        ReferenceKind::ArrayOneDim,
        ReferenceKind::IteratorOneDim,
    ] {
        for occ in index.occurrences_of(&ty, kind) {
            rows.push(ProducerRow {
                operation: occ.value.to_string(),
                kind: format!("{:?}", kind),
                count: occ.count,
            });
        }
    }
    for occ in index.cast_occurrences_of(&ty) {
        rows.push(ProducerRow {
            operation: occ.value.to_string(),
            kind: "cast".to_string(),
            count: occ.count,
        });
    }

    if rows.is_empty() {
        println!("\nNothing in the snapshot produces {}.", ty);
    } else {
        println!("\nProducers:");
        println!("{}", Table::new(rows).with(Style::psql()));
    }

    Ok(())
}
