use super::*;

/// Assigns absolute coordinates level by level. The frontier holds parent
/// entries whose children are placed next; `None` is the synthetic parent of
/// all roots and always stacks. A parent is positioned before any of its
/// children because it sits in an earlier level.
pub(super) fn assign_positions(tree: &mut Tree, params: &LayoutParams) -> Result<()> {
    let mut frontier: Vec<Option<usize>> = vec![None];
    let mut level = 0usize;

    while !frontier.is_empty() {
        let mut next = Vec::new();
        for &entry in &frontier {
            let (origin_x, baseline_y, stacked) = match entry {
                None => (0, params.pad, true),
                Some(parent) => {
                    let node = tree.node(parent);
                    let baseline_y = node
                        .y
                        .checked_add(params.level_step())
                        .ok_or_else(|| overflow(node))?;
                    (node.x, baseline_y, node.stack_children.unwrap_or(false))
                }
            };

            let mut running_x = origin_x;
            let mut running_y = baseline_y;
            let children = tree.children_of(entry).to_vec();
            for child in children {
                let node = tree.node_mut(child);
                let slot = Slot {
                    origin_x,
                    baseline_y,
                    running_x,
                    running_y,
                };
                let placed = slot
                    .place(node, params, stacked)
                    .ok_or_else(|| overflow(node))?;
                (node.x, node.y) = (placed.x, placed.y);
                (running_x, running_y) = (placed.running_x, placed.running_y);
                next.push(Some(child));
            }
        }

        tracing::debug!(level, placed = next.len(), "positioned level");
        frontier = next;
        level += 1;
    }
    Ok(())
}

/// Where the next child of a frontier entry goes.
struct Slot {
    origin_x: i64,
    baseline_y: i64,
    running_x: i64,
    running_y: i64,
}

struct Placed {
    x: i64,
    y: i64,
    running_x: i64,
    running_y: i64,
}

impl Slot {
    /// Stacked children are indented and advance `running_y` by their
    /// height; side-by-side children advance `running_x` by their width. The
    /// `LevelOffset` nudge moves the node itself but never its siblings.
    fn place(&self, node: &Node, params: &LayoutParams, stacked: bool) -> Option<Placed> {
        let nudge = node.level_offset.checked_mul(params.level_step())?;
        if stacked {
            Some(Placed {
                x: self.origin_x.checked_add(params.stack_indent())?,
                y: self.running_y.checked_add(nudge)?,
                running_x: self.running_x,
                running_y: self.running_y.checked_add(node.height)?,
            })
        } else {
            Some(Placed {
                x: self.running_x,
                y: self.baseline_y.checked_add(nudge)?,
                running_x: self.running_x.checked_add(node.width)?,
                running_y: self.running_y,
            })
        }
    }
}

fn overflow(node: &Node) -> LayoutError {
    LayoutError::Overflow {
        id: node.id.clone(),
    }
}
