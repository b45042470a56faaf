use tsp_core::instance::{
    InstanceMetadata,
    distance::{Distance, DistanceMatrixSymmetric, get_lower_triangle_matrix_entry_row_bigger},
};

use super::ParseFromTSPLib;

impl ParseFromTSPLib for DistanceMatrixSymmetric {
    fn from_node_coord_section<PointType: Sync + Send>(
        node_data: &Vec<PointType>,
        metadata: &InstanceMetadata,
        distance_function: impl Fn(&PointType, &PointType) -> Distance + Sync + Send + Copy,
    ) -> Self {
        let dimension = metadata.dimension;
        let size = (dimension * (dimension + 1)) / 2;
        let mut data = vec![Distance::ZERO; size];

        // We only ever compute the strictly-lower part; the diagonal stays at
        // zero, as a node's distance to itself is always zero.
        for row in 0..dimension {
            let row_point = &node_data[row];
            for (column, column_point) in node_data.iter().enumerate().take(row) {
                let distance = distance_function(row_point, column_point);
                data[get_lower_triangle_matrix_entry_row_bigger(row, column)] = distance;
            }
        }

        DistanceMatrixSymmetric::new_from_data(data, dimension)
    }
}
