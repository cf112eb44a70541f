use std::path::Path;

use log::{debug, info};

use crate::{
    error::{HearthError, Result},
    gfx::geometry::GeometryData,
};

/// An imported OBJ flattened into one mesh
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModel {
    pub name: String,
    pub geometry: GeometryData,
    /// Diffuse colour of the first material, grey when the MTL is missing
    pub base_color: [f32; 3],
}

/// Loads an OBJ file, merging every model it contains.
///
/// Normals are recomputed when the file does not provide one per position.
pub fn load_obj(path: &Path) -> Result<LoadedModel> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| HearthError::Model {
        path: path.to_path_buf(),
        source,
    })?;

    let materials = materials.unwrap_or_else(|err| {
        debug!("No usable MTL for {}: {err}", path.display());
        Vec::new()
    });

    let mut geometry = GeometryData::new();
    let mut needs_normals = false;
    for model in &models {
        let mesh = &model.mesh;
        let offset = geometry.vertices.len() as u32;

        geometry
            .vertices
            .extend(mesh.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]));
        if mesh.normals.len() == mesh.positions.len() {
            geometry
                .normals
                .extend(mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]));
        } else {
            needs_normals = true;
        }
        geometry
            .indices
            .extend(mesh.indices.iter().map(|i| i + offset));
    }
    if needs_normals {
        geometry.recompute_normals();
    }

    let base_color = models
        .iter()
        .find_map(|m| m.mesh.material_id)
        .and_then(|id| materials.get(id))
        .and_then(|m| m.diffuse)
        .unwrap_or([0.8, 0.8, 0.8]);

    let name = models
        .first()
        .map(|m| m.name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| path.display().to_string());

    info!(
        "Loaded model {name}: {} vertices, {} triangles",
        geometry.vertex_count(),
        geometry.triangle_count()
    );

    Ok(LoadedModel {
        name,
        geometry,
        base_color,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_a_triangle_and_derives_normals() {
        let path = std::env::temp_dir().join(format!("hearth-model-{}.obj", std::process::id()));
        {
            let mut file = std::fs::File::create(&path).expect("create temp obj");
            writeln!(file, "o tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3").expect("write temp obj");
        }

        let model = load_obj(&path).expect("triangle loads");
        std::fs::remove_file(&path).ok();

        assert_eq!(model.geometry.vertex_count(), 3);
        assert_eq!(model.geometry.triangle_count(), 1);
        assert_eq!(model.geometry.normals.len(), 3);
        assert!((model.geometry.normals[0][2] - 1.0).abs() < 1e-5);
        assert_eq!(model.base_color, [0.8, 0.8, 0.8]);
        assert_eq!(model.name, "tri");
    }

    #[test]
    fn missing_file_is_a_model_error() {
        let err = load_obj(Path::new("/definitely/not/here.obj")).unwrap_err();
        assert!(matches!(err, HearthError::Model { .. }));
    }
}
