//! Exact pins decided before optimal assignment.

use canon_model::SchemaDescriptor;

use crate::utils::compact;

/// One exact assignment found by [`find_exact_pins`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin {
    pub schema_index: usize,
    pub raw_index: usize,
}

/// Folded name patterns, one entry per schema column in declaration order.
pub fn build_name_patterns(schema: &SchemaDescriptor) -> Vec<String> {
    schema.columns.iter().map(|c| compact(&c.name)).collect()
}

/// Folded example aliases per schema column, in priority order.
pub fn build_example_patterns(schema: &SchemaDescriptor) -> Vec<Vec<String>> {
    schema
        .columns
        .iter()
        .map(|c| {
            c.examples
                .iter()
                .map(|e| compact(e))
                .filter(|e| !e.is_empty())
                .collect()
        })
        .collect()
}

/// Pin raw headers that fold to a schema column's name, then those that fold
/// to one of its example aliases.
///
/// Names always pin before examples so a header equal to a canonical name is
/// never taken by another column's alias. Within each pass schema columns
/// are visited in declaration order and raw headers in input order.
pub fn find_exact_pins(raw_columns: &[String], schema: &SchemaDescriptor) -> Vec<Pin> {
    let folded: Vec<String> = raw_columns.iter().map(|r| compact(r)).collect();
    let mut raw_used = vec![false; raw_columns.len()];
    let mut schema_used = vec![false; schema.columns.len()];
    let mut pins = Vec::new();

    let mut pin = |schema_index: usize, pattern: &str, raw_used: &mut [bool]| -> bool {
        if pattern.is_empty() {
            return false;
        }
        let hit = folded
            .iter()
            .enumerate()
            .find(|(raw_index, f)| !raw_used[*raw_index] && f.as_str() == pattern)
            .map(|(raw_index, _)| raw_index);
        match hit {
            Some(raw_index) => {
                raw_used[raw_index] = true;
                pins.push(Pin {
                    schema_index,
                    raw_index,
                });
                true
            }
            None => false,
        }
    };

    for (schema_index, name) in build_name_patterns(schema).iter().enumerate() {
        if pin(schema_index, name, &mut raw_used) {
            schema_used[schema_index] = true;
        }
    }
    for (schema_index, examples) in build_example_patterns(schema).iter().enumerate() {
        if schema_used[schema_index] {
            continue;
        }
        for example in examples {
            if pin(schema_index, example, &mut raw_used) {
                schema_used[schema_index] = true;
                break;
            }
        }
    }
    pins
}
