//! Snapshot capture

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::core::types::Result;
use crate::voxel::{FrameBox, Light, Scene, Sentence, Shape, VoxelBox};

/// One immutable capture of a scene, in the layout the renderer parses.
///
/// The room is routing metadata for the transport and is not part of the
/// serialized payload.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(skip)]
    room: String,
    translation: [f64; 6],
    frame_translations: Vec<[f64; 7]>,
    global_animation: [f64; 8],
    animation: [f64; 8],
    boxes: Vec<VoxelBox>,
    frames: Vec<FrameBox>,
    /// Most recent sentence, for renderers that only read one
    #[serde(serialize_with = "latest_sentence")]
    sentence: Option<Sentence>,
    sentences: Vec<Sentence>,
    lights: Vec<Light>,
    commands: Vec<String>,
    size: f64,
    shape: Shape,
    interval: f64,
    is_metallic: u8,
    roughness: f64,
    is_allowed_float: u8,
    date: String,
}

impl Snapshot {
    /// Copy everything the renderer needs out of `scene`, stamped with `date`
    pub fn capture(room: impl Into<String>, scene: &Scene, date: OffsetDateTime) -> Result<Self> {
        let date = date.to_offset(UtcOffset::UTC).format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        ))?;

        Ok(Self {
            room: room.into(),
            translation: scene.translation(),
            frame_translations: scene.frame_translations().to_vec(),
            global_animation: scene.global_animation(),
            animation: scene.animation(),
            boxes: scene.boxes().to_vec(),
            frames: scene.frames().to_vec(),
            sentence: scene.sentences().last().cloned(),
            sentences: scene.sentences().to_vec(),
            lights: scene.lights().to_vec(),
            commands: scene.commands().to_vec(),
            size: scene.size(),
            shape: scene.shape(),
            interval: scene.build_interval(),
            is_metallic: u8::from(scene.is_metallic()),
            roughness: scene.roughness(),
            is_allowed_float: u8::from(scene.mode().is_float()),
            date,
        })
    }

    /// Room this snapshot is routed to
    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn boxes(&self) -> &[VoxelBox] {
        &self.boxes
    }

    pub fn frames(&self) -> &[FrameBox] {
        &self.frames
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// ISO-8601 capture time in UTC, to the millisecond
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Serialized payload
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// An empty row when nothing has been written yet
fn latest_sentence<S: Serializer>(
    sentence: &Option<Sentence>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match sentence {
        Some(sentence) => sentence.serialize(serializer),
        None => serializer.serialize_seq(Some(0))?.end(),
    }
}

/// Capture `scene` into a snapshot for `room`, then clear the scene for the
/// next batch. The turtle is not touched.
pub fn build_snapshot(room: &str, scene: &mut Scene) -> Result<Snapshot> {
    let snapshot = Snapshot::capture(room, scene, OffsetDateTime::now_utc())?;
    log::debug!(
        "Built snapshot for room {}: {} boxes, {} frame boxes, {} sentences, {} lights",
        room,
        snapshot.boxes.len(),
        snapshot.frames.len(),
        snapshot.sentences.len(),
        snapshot.lights.len()
    );
    scene.clear();
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Color, DVec3};
    use crate::voxel::scene::NO_TEXTURE;

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        scene.place_box(DVec3::new(1.0, 2.0, 3.0), Color::new(1.0, 0.0, 0.0, 1.0), NO_TEXTURE);
        scene.write_sentence("Hello", DVec3::ZERO, Color::BLACK, 8.0, false);
        scene.set_size(0.5);
        scene.set_build_interval(0.2);
        scene
    }

    #[test]
    fn test_payload_field_names() {
        let mut scene = sample_scene();
        let snapshot = build_snapshot("1000", &mut scene).unwrap();
        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();

        for key in [
            "translation",
            "frameTranslations",
            "globalAnimation",
            "animation",
            "boxes",
            "frames",
            "sentence",
            "sentences",
            "lights",
            "commands",
            "size",
            "shape",
            "interval",
            "isMetallic",
            "roughness",
            "isAllowedFloat",
            "date",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json.get("room").is_none());

        assert_eq!(json["boxes"][0], serde_json::json!([1.0, 2.0, 3.0, 1.0, 0.0, 0.0, 1.0, -1.0]));
        assert_eq!(json["sentence"][0], "Hello");
        assert_eq!(json["size"], 0.5);
        assert_eq!(json["interval"], 0.2);
        assert_eq!(json["shape"], "box");
        assert_eq!(json["isMetallic"], 0);
        assert_eq!(json["isAllowedFloat"], 0);
        assert_eq!(json["globalAnimation"], serde_json::json!([0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_build_clears_scene() {
        let mut scene = sample_scene();
        scene.set_command("float");
        let snapshot = build_snapshot("1000", &mut scene).unwrap();

        assert_eq!(snapshot.boxes().len(), 1);
        assert_eq!(snapshot.size(), 0.5);
        assert_eq!(snapshot.room(), "1000");
        assert_eq!(scene, Scene::new());
    }

    #[test]
    fn test_snapshot_isolated_from_later_edits() {
        let mut scene = sample_scene();
        let snapshot = Snapshot::capture("1000", &scene, OffsetDateTime::UNIX_EPOCH).unwrap();
        let before = snapshot.clone();

        scene.place_box(DVec3::new(9.0, 9.0, 9.0), Color::BLACK, NO_TEXTURE);
        scene.place_box(DVec3::new(1.0, 2.0, 3.0), Color::BLACK, NO_TEXTURE);
        scene.clear();

        assert_eq!(snapshot, before);
        assert_eq!(snapshot.boxes()[0].color, Color::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_date_is_utc_millis() {
        let scene = Scene::new();
        let snapshot = Snapshot::capture("1000", &scene, OffsetDateTime::UNIX_EPOCH).unwrap();
        assert_eq!(snapshot.date(), "1970-01-01T00:00:00.000Z");

        let local = time::macros::datetime!(2026-10-18 09:30:04.155504633 +02:00);
        let snapshot = Snapshot::capture("1000", &scene, local).unwrap();
        assert_eq!(snapshot.date(), "2026-10-18T07:30:04.155Z");
    }

    #[test]
    fn test_missing_sentence_is_empty_row() {
        let mut scene = Scene::new();
        let snapshot = build_snapshot("1000", &mut scene).unwrap();
        let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["sentence"], serde_json::json!([]));
        assert_eq!(json["sentences"], serde_json::json!([]));
    }

    #[test]
    fn test_float_flag() {
        let mut scene = Scene::new();
        scene.set_command("float");
        scene.set_material(true, 0.2);
        let snapshot = build_snapshot("1000", &mut scene).unwrap();
        let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["isAllowedFloat"], 1);
        assert_eq!(json["isMetallic"], 1);
        assert_eq!(json["commands"], serde_json::json!(["float"]));
    }
}
