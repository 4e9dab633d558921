use crate::assets::model::Model;

/// One indexed draw call.
///
/// The renderer binds the world matrix of `node_index`, the material at
/// `material_index`, and draws `index_count` indices starting at
/// `index_start` from the model's shared index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawItem {
    pub node_index: usize,
    pub material_index: usize,
    pub index_start: u32,
    pub index_count: u32,
}

/// Lists the draw calls of `model` in node order, sub-mesh order within a
/// node. `out` is cleared first so the buffer can be kept between frames.
///
/// Empty sub-meshes are skipped.
pub fn collect_draw_items(model: &Model, out: &mut Vec<DrawItem>) {
    out.clear();
    for node_index in 0..model.nodes().len() {
        out.extend(
            model
                .node_sub_meshes(node_index)
                .iter()
                .filter(|s| s.index_count > 0)
                .map(|s| DrawItem {
                    node_index,
                    material_index: s.material_index as usize,
                    index_start: s.start_index,
                    index_count: s.index_count,
                }),
        );
    }
}
