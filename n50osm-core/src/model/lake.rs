/// a lake record loaded from the NVE lakes service (§6).
#[derive(Debug, Clone)]
pub struct LakeRecord {
    pub nve_ref: String,
    pub name: Option<String>,
    pub ele: Option<f64>,
    pub area_km2: f64,
    pub magazine_id: Option<String>,
}
