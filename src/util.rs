use itertools::Itertools;

/// Lays multi-line strings out side by side, one per column, padding short columns.
///
/// Every column is expected to be one character wide.
pub fn join_vertical(strings: Vec<String>) -> String {
    let columns: Vec<Vec<&str>> = strings.iter().map(|s| s.split('\n').collect()).collect();
    let length = columns.iter().map(Vec::len).max().unwrap_or(0);

    (0..length)
        .map(|y| {
            // leading space lines the columns up under the cell row
            format!(" {}", columns.iter().map(|column| column.get(y).copied().unwrap_or(" ")).join(""))
        })
        .map(|line| line + "\n")
        .collect()
}
