//! Tests for namespaces and Merkle trees.

use std::collections::HashMap;

use assert_matches::assert_matches;
use sha2::{Digest, Sha256};
use test_casing::test_casing;

use super::*;

fn sha256(parts: &[&[u8]]) -> [u8; HASH_SIZE] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

fn namespace(byte: u8) -> Namespace {
    let mut bytes = [0_u8; NAMESPACE_SIZE];
    bytes[NAMESPACE_SIZE - 1] = byte;
    Namespace::from_raw(bytes)
}

fn share(namespace: Namespace, fill: u8) -> Vec<u8> {
    let mut share = namespace.as_bytes().to_vec();
    share.resize(64, fill);
    share
}

#[test]
fn namespace_is_left_padded() {
    let namespace = Namespace::from_name("nitro-dev").unwrap();

    let mut expected = [0_u8; NAMESPACE_SIZE];
    expected[NAMESPACE_SIZE - 9..].copy_from_slice(b"nitro-dev");
    assert_eq!(*namespace.as_bytes(), expected);
    assert_eq!(
        namespace.to_string(),
        format!("{}{}", "00".repeat(20), hex::encode("nitro-dev"))
    );
}

#[test_casing(3, ["", "a", "exactly-twenty-nine-bytes-abc"])]
fn namespace_fits(name: &str) {
    let namespace = Namespace::from_name(name).unwrap();
    assert_eq!(&namespace.as_bytes()[NAMESPACE_SIZE - name.len()..], name.as_bytes());
    assert!(namespace.as_bytes()[..NAMESPACE_SIZE - name.len()]
        .iter()
        .all(|&byte| byte == 0));
}

#[test]
fn too_long_namespace_is_rejected() {
    let name = "a".repeat(NAMESPACE_SIZE + 1);
    let err = Namespace::from_name(&name).unwrap_err();
    assert_matches!(err, NamespaceError::TooLong { len, .. } if len == NAMESPACE_SIZE + 1);

    // Multi-byte UTF-8 chars count by bytes.
    let name = "ü".repeat(15);
    assert_matches!(
        Namespace::from_name(&name),
        Err(NamespaceError::TooLong { len: 30, .. })
    );
}

#[test]
fn namespace_from_raw_slice() {
    assert_matches!(
        Namespace::try_from(&[0_u8; 28][..]),
        Err(NamespaceError::InvalidLength(28))
    );
    let namespace = Namespace::try_from(&[0xff_u8; NAMESPACE_SIZE][..]).unwrap();
    assert!(namespace.is_parity());
    assert!(namespace > Namespace::from_name("nitro-dev").unwrap());
}

#[test]
fn merkle_root_of_empty_list() {
    let mut hasher = RecordingHasher::new(None);
    let root = hash_from_byte_slices::<&[u8]>(&mut hasher, &[]);
    assert_eq!(
        hex::encode(root),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn merkle_root_of_single_empty_item() {
    let mut hasher = RecordingHasher::new(None);
    let root = hash_from_byte_slices(&mut hasher, &[[0_u8; 0]]);
    assert_eq!(
        hex::encode(root),
        "6e340b9cffb37a989ca544e6bb780a2c78901d3fb33738768511a30617afa01d"
    );
}

#[test]
fn merkle_tree_is_split_at_power_of_two() {
    let items: Vec<Vec<u8>> = (0_u8..5).map(|i| vec![i; 3]).collect();
    let leaves: Vec<_> = items.iter().map(|item| sha256(&[&[0], item])).collect();
    let inner = |left: &[u8; 32], right: &[u8; 32]| sha256(&[&[1], left, right]);

    // 5 items are split as 4 + 1, and the left subtree is split as 2 + 2.
    let left = inner(&inner(&leaves[0], &leaves[1]), &inner(&leaves[2], &leaves[3]));
    let expected = inner(&left, &leaves[4]);

    let mut hasher = RecordingHasher::new(None);
    assert_eq!(hash_from_byte_slices(&mut hasher, &items), expected);

    // 3 items are split as 2 + 1.
    let expected = inner(&inner(&leaves[0], &leaves[1]), &leaves[2]);
    assert_eq!(hash_from_byte_slices(&mut hasher, &items[..3]), expected);
}

#[test]
fn merkle_root_depends_on_order() {
    let mut hasher = RecordingHasher::new(None);
    let root = hash_from_byte_slices(&mut hasher, &[b"a", b"b"]);
    let swapped_root = hash_from_byte_slices(&mut hasher, &[b"b", b"a"]);
    assert_ne!(root, swapped_root);
}

#[test]
fn hasher_records_preimages() {
    let items = [b"row".to_vec(), b"column".to_vec()];
    let mut preimages: HashMap<[u8; HASH_SIZE], Vec<u8>> = HashMap::new();
    let mut hasher = RecordingHasher::new(Some(&mut preimages));
    let root = hash_from_byte_slices(&mut hasher, &items);

    // 2 leaves + 1 inner node
    assert_eq!(preimages.len(), 3);
    let root_preimage = &preimages[&root];
    assert_eq!(root_preimage[0], 1);
    assert_eq!(root_preimage.len(), 1 + 2 * HASH_SIZE);
    for (hash, preimage) in &preimages {
        assert_eq!(*hash, sha256(&[preimage]));
    }

    let mut plain_hasher = RecordingHasher::new(None);
    assert_eq!(hash_from_byte_slices(&mut plain_hasher, &items), root);
}

#[test]
fn empty_nmt_root() {
    let tree = NamespacedMerkleTree::new(true);
    let root = tree.root(&mut RecordingHasher::new(None)).unwrap();

    let bytes = root.to_bytes();
    assert_eq!(bytes[..2 * NAMESPACE_SIZE], [0; 2 * NAMESPACE_SIZE]);
    assert_eq!(bytes[2 * NAMESPACE_SIZE..], sha256(&[])[..]);
}

#[test]
fn nmt_nodes_commit_to_namespace_ranges() {
    let mut tree = NamespacedMerkleTree::new(false);
    tree.push(namespace(1), b"first").unwrap();
    tree.push(namespace(3), b"second").unwrap();
    let root = tree.root(&mut RecordingHasher::new(None)).unwrap();

    let left = sha256(&[&[0], namespace(1).as_bytes(), b"first"]);
    let right = sha256(&[&[0], namespace(3).as_bytes(), b"second"]);
    let left_node = [namespace(1).as_bytes().as_slice(), namespace(1).as_bytes(), &left].concat();
    let right_node = [namespace(3).as_bytes().as_slice(), namespace(3).as_bytes(), &right].concat();

    assert_eq!(root.min_namespace(), namespace(1));
    assert_eq!(root.max_namespace(), namespace(3));
    assert_eq!(root.digest(), sha256(&[&[1], &left_node, &right_node]));
    assert_eq!(NmtNode::from_bytes(&root.to_bytes()), Some(root));
    assert_eq!(NmtNode::from_bytes(&root.to_bytes()[1..]), None);
}

#[test]
fn nmt_rejects_unordered_leaves() {
    let mut tree = NamespacedMerkleTree::new(true);
    tree.push(namespace(2), b"data").unwrap();
    tree.push(namespace(2), b"same namespace").unwrap();
    let err = tree.push(namespace(1), b"data").unwrap_err();
    assert_matches!(err, NmtError::UnorderedNamespace { prev, next } if prev == namespace(2) && next == namespace(1));
    assert_eq!(tree.len(), 2);
}

#[test]
fn parity_namespace_is_ignored_in_max_namespace() {
    let mut ignoring = NamespacedMerkleTree::new(true);
    let mut plain = NamespacedMerkleTree::new(false);
    for tree in [&mut ignoring, &mut plain] {
        tree.push(namespace(1), b"data").unwrap();
        tree.push(Namespace::PARITY, b"parity").unwrap();
    }

    let mut hasher = RecordingHasher::new(None);
    let ignoring_root = ignoring.root(&mut hasher).unwrap();
    let plain_root = plain.root(&mut hasher).unwrap();
    assert_eq!(ignoring_root.max_namespace(), namespace(1));
    assert_eq!(plain_root.max_namespace(), Namespace::PARITY);
    // Child nodes are the same, so digests coincide.
    assert_eq!(ignoring_root.digest(), plain_root.digest());
}

#[test]
fn original_row_uses_share_namespaces() {
    let ods_size = 2;
    let mut tree = ErasuredRowTree::new(ods_size, 0);
    for share in [share(namespace(1), 1), share(namespace(2), 2), vec![7; 64], vec![8; 64]] {
        tree.push(&share).unwrap();
    }
    let root = tree.root(&mut RecordingHasher::new(None)).unwrap();
    assert_eq!(root.min_namespace(), namespace(1));
    assert_eq!(root.max_namespace(), namespace(2));
}

#[test]
fn parity_row_uses_parity_namespace() {
    let ods_size = 2;
    let shares = [share(namespace(1), 1), share(namespace(2), 2), vec![7; 64], vec![8; 64]];

    let mut parity_tree = ErasuredRowTree::new(ods_size, 2);
    let mut expected_tree = NamespacedMerkleTree::new(true);
    for share in &shares {
        parity_tree.push(share).unwrap();
        expected_tree.push(Namespace::PARITY, share).unwrap();
    }

    let mut hasher = RecordingHasher::new(None);
    let root = parity_tree.root(&mut hasher).unwrap();
    assert_eq!(root, expected_tree.root(&mut hasher).unwrap());
    assert!(root.min_namespace().is_parity());
}

#[test]
fn erasured_row_errors() {
    let mut tree = ErasuredRowTree::new(1, 0);
    assert_matches!(
        tree.push(&[0; 10]),
        Err(NmtError::ShareTooShort { index: 0, len: 10 })
    );
    tree.push(&share(namespace(1), 0)).unwrap();
    assert_matches!(
        tree.push(&[0; 10]),
        Err(NmtError::ShareTooShort { index: 1, len: 10 })
    );
    tree.push(&[0; 64]).unwrap();
    assert_matches!(
        tree.push(&[0; 64]),
        Err(NmtError::RowOverflow { row: 0, width: 2 })
    );
}
