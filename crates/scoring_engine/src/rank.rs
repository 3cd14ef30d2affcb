use core_types::{FnKey, FunctionVector};

/// Functions by descending value; equal values keep canonical order.
pub fn rank_functions(functions: &FunctionVector) -> Vec<FnKey> {
    let mut order = FnKey::ALL.to_vec();
    // stable sort keeps the canonical order among ties
    order.sort_by(|a, b| {
        functions[*b]
            .partial_cmp(&functions[*a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}
