use super::*;

/// Sizes every subtree, starting from each root with side-by-side as the
/// inherited mode. Roots are independent; there is no cross-root balancing.
pub(super) fn prepare_all(tree: &mut Tree, params: &LayoutParams) -> Result<()> {
    let roots = tree.roots().to_vec();
    for root in roots {
        prepare(tree, params, root)?;
        let node = tree.node(root);
        tracing::debug!(
            id = %node.id,
            width = node.width,
            height = node.height,
            "sized root subtree"
        );
    }
    Ok(())
}

/// Walks the subtree of `root` with an explicit stack, resolving
/// `StackChildren` top-down in pre-order, then sizes the nodes in reverse
/// pre-order so every child is sized before its parent.
fn prepare(tree: &mut Tree, params: &LayoutParams, root: usize) -> Result<()> {
    let mut order = Vec::new();
    let mut pending = vec![(root, false)];
    while let Some((idx, inherited_stack)) = pending.pop() {
        let stack = *tree
            .node_mut(idx)
            .stack_children
            .get_or_insert(inherited_stack);
        order.push(idx);
        pending.extend(tree.children(idx).iter().rev().map(|&child| (child, stack)));
    }

    for &idx in order.iter().rev() {
        let (width, height) = footprint(tree, params, idx).ok_or_else(|| {
            LayoutError::Overflow {
                id: tree.node(idx).id.clone(),
            }
        })?;
        let node = tree.node_mut(idx);
        node.width = width;
        node.height = height;
    }
    Ok(())
}

/// Footprint of `idx` from its already sized children, `None` when it does
/// not fit in `i64`.
fn footprint(tree: &Tree, params: &LayoutParams, idx: usize) -> Option<(i64, i64)> {
    let children = tree.children(idx);
    if children.is_empty() {
        return Some((
            params.node_width + 2 * params.pad,
            params.node_height + params.pad,
        ));
    }

    let mut sizes = children.iter().map(|&child| {
        let node = tree.node(child);
        (node.width, node.height)
    });
    if tree.node(idx).stack_children == Some(true) {
        let (max_width, sum_height) = sizes.try_fold((0i64, 0i64), |(w, h), (cw, ch)| {
            Some((w.max(cw), h.checked_add(ch)?))
        })?;
        Some((
            max_width.checked_add(params.stack_indent())?,
            params.level_step().checked_add(sum_height)?,
        ))
    } else {
        sizes.try_fold((0i64, 0i64), |(w, h), (cw, ch)| {
            Some((w.checked_add(cw)?, h.max(ch)))
        })
    }
}
