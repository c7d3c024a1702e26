use nubit_da_client::{
    types::{SquareData, VerificationError},
    BlobPointer, PreimageRecorder,
};
use nubit_nmt::{
    hash_from_byte_slices, ErasuredRowTree, NmtNode, RecordingHasher, NAMESPACE_SIZE, NMT_NODE_SIZE,
};

/// Verifies that the fetched rows are consistent with the data root committed in `pointer`.
///
/// Each fetched row is rehashed into its namespaced Merkle root and compared with the row root
/// at the same absolute index; verification stops at the first mismatching row. Afterwards,
/// row roots followed by column roots are rolled into the data root, which must match the pointer.
/// All hash preimages are reported to `preimages` if it's provided.
///
/// Only the square is authenticated. Whether the payload returned alongside it is actually stored
/// in the verified shares is not checked here, so a transport pairing a genuine square with other
/// payload bytes goes undetected.
pub fn verify_square(
    pointer: &BlobPointer,
    square: &SquareData,
    preimages: Option<&mut dyn PreimageRecorder>,
) -> Result<(), VerificationError> {
    check_geometry(pointer, square)?;

    let mut hasher = RecordingHasher::new(preimages);
    let ods_size = square.square_size / 2;
    for (row_index, row) in (square.start_row..).zip(&square.rows) {
        let nmt_error = |source| VerificationError::Nmt {
            row: row_index,
            source,
        };
        let mut tree = ErasuredRowTree::new(ods_size, row_index);
        for share in row {
            tree.push(share).map_err(nmt_error)?;
        }
        let computed_root = tree.root(&mut hasher).map_err(nmt_error)?.to_bytes();

        let expected_root = usize::try_from(row_index)
            .ok()
            .and_then(|index| square.row_roots.get(index))
            .ok_or_else(|| {
                VerificationError::InvalidSquareGeometry(format!("no root for row #{row_index}"))
            })?;
        if expected_root.as_slice() != computed_root.as_slice() {
            tracing::error!(
                row_index,
                expected_root = hex::encode(expected_root),
                computed_root = hex::encode(computed_root),
                "Row roots do not match"
            );
            return Err(VerificationError::RowRootMismatch {
                row: row_index,
                expected: hex::encode(expected_root),
                actual: hex::encode(computed_root),
            });
        }
    }

    let roots: Vec<&[u8]> = square
        .row_roots
        .iter()
        .chain(&square.column_roots)
        .map(Vec::as_slice)
        .collect();
    let data_root = hash_from_byte_slices(&mut hasher, &roots);
    if data_root != pointer.data_root {
        tracing::error!(
            expected_data_root = hex::encode(pointer.data_root),
            computed_data_root = hex::encode(data_root),
            "Data roots do not match"
        );
        return Err(VerificationError::DataRootMismatch {
            expected: hex::encode(pointer.data_root),
            actual: hex::encode(data_root),
        });
    }
    Ok(())
}

fn check_geometry(pointer: &BlobPointer, square: &SquareData) -> Result<(), VerificationError> {
    let invalid = |message: String| Err(VerificationError::InvalidSquareGeometry(message));

    let square_size = square.square_size;
    if square_size == 0 || square_size % 2 != 0 {
        return invalid(format!(
            "extended square size {square_size} is not a positive even number"
        ));
    }
    if square_size != pointer.square_size {
        return invalid(format!(
            "square size {square_size} differs from {} in blob pointer",
            pointer.square_size
        ));
    }
    if (square.start_row, square.end_row) != (pointer.start_row, pointer.end_row) {
        return invalid(format!(
            "fetched rows {}..={} differ from rows {}..={} in blob pointer",
            square.start_row, square.end_row, pointer.start_row, pointer.end_row
        ));
    }
    let row_count = match pointer.row_count() {
        Some(count) if pointer.end_row < square_size => count,
        _ => {
            return invalid(format!(
                "row range {}..={} doesn't fit into square of size {square_size}",
                pointer.start_row, pointer.end_row
            ));
        }
    };

    for (name, roots) in [("row", &square.row_roots), ("column", &square.column_roots)] {
        if roots.len() as u64 != square_size {
            return invalid(format!(
                "expected {square_size} {name} roots, got {}",
                roots.len()
            ));
        }
        if let Some(index) = roots
            .iter()
            .position(|root| NmtNode::from_bytes(root).is_none())
        {
            return invalid(format!(
                "{name} root #{index} is not a {NMT_NODE_SIZE}-byte namespaced node"
            ));
        }
    }

    if square.rows.len() as u64 != row_count {
        return invalid(format!(
            "expected {row_count} rows, got {}",
            square.rows.len()
        ));
    }
    for (row_index, row) in (square.start_row..).zip(&square.rows) {
        if row.len() as u64 != square_size {
            return invalid(format!(
                "row #{row_index} has {} shares, expected {square_size}",
                row.len()
            ));
        }
        if let Some(position) = row.iter().position(|share| share.len() < NAMESPACE_SIZE) {
            return invalid(format!(
                "share #{position} in row #{row_index} is shorter than a namespace"
            ));
        }
    }
    Ok(())
}
