/*!
# PACE Graph I/O

Reading graphs in the PACE `.gr` textual format (plus the `.dgf` sub-dialect)
and writing tree decompositions in the `.td` format.

The `.gr` format: lines starting with `c` are comments, the first non-comment
line is `p tw N M` declaring vertices 1..=N, and every remaining line names
one edge `u v`. Multi-edges and self loops are ignored. The `.dgf` dialect
spells edges as `e u v` and its `n`/`d`/`v`/`x`/`b`/`l` records are skipped.
*/

use std::io::{BufRead, Write};

use crate::core::decomposition::TreeDecomposition;
use crate::core::error::{Result, TreedecError};
use crate::core::graph::Graph;

/// Reads a `.gr` or `.dgf` graph from a buffered reader.
pub fn read_graph<R: BufRead>(reader: R) -> Result<Graph> {
    let mut graph: Option<Graph> = None;
    let mut declared = 0u32;
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut tokens = trimmed.split_whitespace();
        let head = tokens.next().expect("non-empty line has a token");
        match head {
            "c" => continue,
            "p" => {
                if graph.is_some() {
                    return Err(TreedecError::parse("duplicate problem line"));
                }
                let descriptor = tokens.next();
                if descriptor != Some("tw") && descriptor != Some("edge") {
                    return Err(TreedecError::parse(format!(
                        "unsupported problem descriptor {:?}",
                        descriptor
                    )));
                }
                let n: u32 = parse_token(tokens.next())?;
                let _m: usize = parse_token(tokens.next())?;
                graph = Some(Graph::with_vertices(1..=n));
                declared = n;
            }
            "n" | "d" | "v" | "x" | "b" | "l" => continue,
            "e" => {
                let g = graph
                    .as_mut()
                    .ok_or_else(|| TreedecError::parse("edge before problem line"))?;
                let u: u32 = parse_token(tokens.next())?;
                let v: u32 = parse_token(tokens.next())?;
                add_checked_edge(g, declared, u, v)?;
            }
            _ => {
                let g = graph
                    .as_mut()
                    .ok_or_else(|| TreedecError::parse("edge before problem line"))?;
                let u: u32 = head
                    .parse()
                    .map_err(|_| TreedecError::parse(format!("bad token '{}'", head)))?;
                let v: u32 = parse_token(tokens.next())?;
                add_checked_edge(g, declared, u, v)?;
            }
        }
    }
    graph.ok_or_else(|| TreedecError::parse("missing problem line"))
}

fn parse_token<T: std::str::FromStr>(token: Option<&str>) -> Result<T> {
    token
        .ok_or_else(|| TreedecError::parse("truncated line"))?
        .parse()
        .map_err(|_| TreedecError::parse(format!("bad token '{}'", token.unwrap_or(""))))
}

fn add_checked_edge(graph: &mut Graph, declared: u32, u: u32, v: u32) -> Result<()> {
    if u == 0 || v == 0 || u > declared || v > declared {
        return Err(TreedecError::parse(format!(
            "edge {{{}, {}}} outside 1..={}",
            u, v, declared
        )));
    }
    if u != v {
        graph.add_edge(u, v);
    }
    Ok(())
}

/// Convenience wrapper parsing a graph from an in-memory string.
pub fn read_graph_from_str(input: &str) -> Result<Graph> {
    read_graph(input.as_bytes())
}

/// Writes a tree decomposition in the PACE `.td` format: the `s td B W N`
/// header, one `b` line per bag, then the tree edges with the smaller id
/// first.
pub fn write_decomposition<W: Write>(mut writer: W, td: &TreeDecomposition) -> Result<()> {
    writeln!(
        writer,
        "s td {} {} {}",
        td.num_bags(),
        td.max_bag_size(),
        td.num_graph_vertices()
    )?;
    for bag in td.bags() {
        let mut line = format!("b {}", bag.id);
        for v in &bag.vertices {
            line.push(' ');
            line.push_str(&v.to_string());
        }
        writeln!(writer, "{}", line)?;
    }
    let mut edges = td.edges();
    edges.sort_unstable();
    for (a, b) in edges {
        writeln!(writer, "{} {}", a, b)?;
    }
    Ok(())
}
