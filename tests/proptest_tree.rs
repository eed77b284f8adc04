//! Property-based tests for the search tree engine.
//!
//! Properties verified across random insert/delete sequences:
//! - inorder always yields a strictly increasing key sequence,
//! - node count equals successful inserts minus successful deletes,
//! - AVL trees keep every recomputed balance factor in range,
//! - Red-Black trees keep a black root, no red-red edge, and equal
//!   black-heights,
//! - the BST rebuild reaches minimum height.

use algovis::prelude::*;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

fn keys() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..200, 1..60)
}

/// Interleaved operation script: `Ok(k)` inserts, `Err(k)` deletes.
fn script() -> impl Strategy<Value = Vec<Result<i64, i64>>> {
    prop::collection::vec(
        prop_oneof![(0i64..100).prop_map(Ok), (0i64..100).prop_map(Err)],
        1..80,
    )
}

fn apply_script(kind: TreeKind, script: &[Result<i64, i64>]) -> (SearchTree<i64>, usize) {
    let mut tree = SearchTree::new(kind);
    let mut expected = 0usize;
    for op in script {
        match *op {
            Ok(key) => {
                if tree.insert(key).is_some() {
                    expected += 1;
                }
            }
            Err(key) => {
                if tree.delete(key) {
                    expected -= 1;
                }
            }
        }
    }
    (tree, expected)
}

fn assert_sorted(keys: &[i64]) -> Result<(), TestCaseError> {
    for window in keys.windows(2) {
        prop_assert!(window[0] < window[1], "inorder not increasing: {keys:?}");
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_bst_inorder_sorted(keys in keys()) {
        let mut tree = SearchTree::new(TreeKind::Bst);
        for &key in &keys {
            tree.insert(key);
        }
        assert_sorted(&tree.inorder())?;
        prop_assert!(tree.validate().is_ok());
    }

    #[test]
    fn prop_avl_invariants_after_script(script in script()) {
        let (tree, expected) = apply_script(TreeKind::Avl, &script);
        prop_assert_eq!(tree.stats().node_count, expected);
        assert_sorted(&tree.inorder())?;
        if let Err(violation) = tree.validate() {
            return Err(TestCaseError::fail(format!("AVL violation: {violation}")));
        }
        prop_assert!(tree.stats().is_balanced);
    }

    #[test]
    fn prop_redblack_invariants_after_script(script in script()) {
        let (tree, expected) = apply_script(TreeKind::RedBlack, &script);
        prop_assert_eq!(tree.stats().node_count, expected);
        assert_sorted(&tree.inorder())?;
        if let Err(violation) = tree.validate() {
            return Err(TestCaseError::fail(format!("Red-Black violation: {violation}")));
        }
    }

    #[test]
    fn prop_bst_count_consistency(script in script()) {
        let (tree, expected) = apply_script(TreeKind::Bst, &script);
        prop_assert_eq!(tree.stats().node_count, expected);
        prop_assert_eq!(tree.inorder().len(), expected);
    }

    #[test]
    fn prop_balance_rebuild_reaches_minimum_height(keys in keys()) {
        let mut tree = SearchTree::new(TreeKind::Bst);
        for &key in &keys {
            tree.insert(key);
        }
        let n = tree.stats().node_count;
        tree.balance_tree();

        prop_assert_eq!(tree.stats().node_count, n);
        assert_sorted(&tree.inorder())?;
        // Minimum height of a BST on n keys: ⌈log2(n + 1)⌉.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let expected_height = ((n + 1) as f64).log2().ceil() as u32;
        prop_assert_eq!(tree.stats().height, expected_height);
    }

    #[test]
    fn prop_traversals_are_permutations(keys in keys()) {
        let mut tree = SearchTree::new(TreeKind::Avl);
        for &key in &keys {
            tree.insert(key);
        }
        let mut inorder = tree.inorder();
        let mut preorder = tree.preorder();
        let mut postorder = tree.postorder();
        let mut levelorder = tree.levelorder();
        preorder.sort_unstable();
        postorder.sort_unstable();
        levelorder.sort_unstable();
        inorder.sort_unstable();
        prop_assert_eq!(&preorder, &inorder);
        prop_assert_eq!(&postorder, &inorder);
        prop_assert_eq!(&levelorder, &inorder);
    }
}
