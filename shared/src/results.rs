use crate::models::{ModelResult, ResultsBundle, SimilarityScores};

/// Leftover groups get no running number in the detail table.
pub const LEFTOVER_GROUPS: [&str; 2] = ["บุคคลที่ไม่ถูกจัดกลุ่ม", "สถานที่ที่ไม่ถูกจัดกลุ่ม"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Face,
    Background,
}

impl ModelKind {
    pub fn of(result: &ModelResult) -> Option<Self> {
        match result {
            ModelResult::Face(_) => Some(ModelKind::Face),
            ModelResult::Background(_) => Some(ModelKind::Background),
            ModelResult::Unrecognized(_) => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ModelKind::Face => "ใบหน้า",
            ModelKind::Background => "ฉากหลัง",
        }
    }

    /// The helper model the backend runs ahead of this kind of model.
    pub fn auxiliary_model(self) -> &'static str {
        match self {
            ModelKind::Face => "retina (face detection)",
            ModelKind::Background => "deeplab (background segmentation)",
        }
    }
}

/// One line of the cross-model summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow<'a> {
    pub model_name: &'a str,
    pub kind: ModelKind,
    pub image_count: u64,
    pub processing_time: f64,
}

impl SummaryRow<'_> {
    pub fn processing_time_label(&self) -> String {
        format!("{:.2}", self.processing_time)
    }
}

/// Summary rows in bundle order; unrecognised records are skipped.
pub fn summary_rows(bundle: &ResultsBundle) -> Vec<SummaryRow<'_>> {
    bundle
        .iter()
        .filter_map(|(model_name, result)| {
            Some(SummaryRow {
                model_name,
                kind: ModelKind::of(result)?,
                image_count: result.image_count()?,
                processing_time: result.processing_time()?,
            })
        })
        .collect()
}

/// One member list of one group, with its averaged scores.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow<'a> {
    pub label: &'a str,
    /// 1-based position inside its group, `None` for leftover groups.
    pub position: Option<usize>,
    pub members: &'a [String],
    pub score_key: String,
    pub scores: SimilarityScores,
}

impl GroupRow<'_> {
    pub fn position_label(&self) -> String {
        self.position.map_or_else(|| "-".to_string(), |p| p.to_string())
    }

    pub fn members_label(&self) -> String {
        self.members.join(", ")
    }

    pub fn cosine_label(&self) -> String {
        percent(self.scores.cosine)
    }

    pub fn pearson_label(&self) -> String {
        percent(self.scores.pearson)
    }
}

fn percent(score: f64) -> String {
    format!("{:.2}%", score * 100.0)
}

/// Detail rows for one model. Score keys are `<label>_<n>` where `n` is a
/// single counter running across every group of the model, not per group.
pub fn group_rows(result: &ModelResult) -> Vec<GroupRow<'_>> {
    let Some((groups, scores)) = result.groups_and_scores() else {
        return Vec::new();
    };

    let mut counter = 0usize;
    let mut rows = Vec::new();
    for (label, member_lists) in groups.iter() {
        let leftover = LEFTOVER_GROUPS.contains(&label);
        for (index, members) in member_lists.iter().enumerate() {
            let score_key = format!("{}_{}", label, counter);
            counter += 1;
            rows.push(GroupRow {
                label,
                position: (!leftover).then_some(index + 1),
                members,
                scores: scores.get(&score_key).copied().unwrap_or_default(),
                score_key,
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(raw: &str) -> ResultsBundle {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn empty_bundle_has_no_summary() {
        assert!(summary_rows(&bundle("{}")).is_empty());
    }

    #[test]
    fn summary_labels_follow_record_shape() {
        let results = bundle(
            r#"{
                "VGG-Face": { "image_count": 12, "processing_time": 3.14159, "face_groups": {}, "avg_face_scores": {} },
                "DeepLab": { "image_count": 12, "processing_time": 10, "background_groups": {}, "avg_background_scores": {} },
                "junk": 7
            }"#,
        );
        let rows = summary_rows(&results);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].model_name, "VGG-Face");
        assert_eq!(rows[0].kind.label(), "ใบหน้า");
        assert_eq!(rows[0].kind.auxiliary_model(), "retina (face detection)");
        assert_eq!(rows[0].processing_time_label(), "3.14");
        assert_eq!(rows[1].kind, ModelKind::Background);
        assert_eq!(rows[1].kind.auxiliary_model(), "deeplab (background segmentation)");
        assert_eq!(rows[1].processing_time_label(), "10.00");
    }

    #[test]
    fn score_ordinals_are_shared_across_groups() {
        let results = bundle(
            r#"{
                "SFace": {
                    "image_count": 5,
                    "processing_time": 1.0,
                    "face_groups": {
                        "บุคคลที่ 1": [["a.jpg", "b.jpg"]],
                        "บุคคลที่ไม่ถูกจัดกลุ่ม": [["c.jpg", "d.jpg", "e.jpg"]]
                    },
                    "avg_face_scores": {
                        "บุคคลที่ 1_0": { "cosine": 0.91, "pearson": 0.88 },
                        "บุคคลที่ไม่ถูกจัดกลุ่ม_1": { "cosine": 0.4, "pearson": 0.35 }
                    }
                }
            }"#,
        );
        let rows = group_rows(results.get("SFace").unwrap());
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].score_key, "บุคคลที่ 1_0");
        assert_eq!(rows[0].members.len(), 2);
        assert_eq!(rows[0].position_label(), "1");
        assert_eq!(rows[0].cosine_label(), "91.00%");

        assert_eq!(rows[1].score_key, "บุคคลที่ไม่ถูกจัดกลุ่ม_1");
        assert_eq!(rows[1].members.len(), 3);
        assert_eq!(rows[1].position_label(), "-");
        assert_eq!(rows[1].members_label(), "c.jpg, d.jpg, e.jpg");
        assert_eq!(rows[1].pearson_label(), "35.00%");
    }

    #[test]
    fn counter_keeps_running_inside_a_group() {
        let results = bundle(
            r#"{
                "Places": {
                    "image_count": 6,
                    "processing_time": 1.0,
                    "background_groups": {
                        "สถานที่": [["a.jpg", "b.jpg"], ["c.jpg", "d.jpg"]],
                        "สถานที่ที่ไม่ถูกจัดกลุ่ม": [["e.jpg", "f.jpg"]]
                    },
                    "avg_background_scores": {}
                }
            }"#,
        );
        let rows = group_rows(results.get("Places").unwrap());
        let keys: Vec<_> = rows.iter().map(|r| r.score_key.as_str()).collect();
        assert_eq!(keys, vec!["สถานที่_0", "สถานที่_1", "สถานที่ที่ไม่ถูกจัดกลุ่ม_2"]);
        assert_eq!(rows[1].position, Some(2));
        assert_eq!(rows[2].position, None);
        assert_eq!(rows[0].scores, SimilarityScores::default());
        assert_eq!(rows[0].cosine_label(), "0.00%");
    }

    #[test]
    fn null_pearson_still_renders_the_model() {
        let results = bundle(
            r#"{
                "ArcFace": {
                    "image_count": 2,
                    "processing_time": 0.5,
                    "face_groups": { "บุคคล": [["a.jpg", "b.jpg"]] },
                    "avg_face_scores": { "บุคคล_0": { "cosine": 0.875, "pearson": null } }
                },
                "DeepLab": {
                    "image_count": 3.0,
                    "processing_time": null,
                    "background_groups": {}
                }
            }"#,
        );
        let summary = summary_rows(&results);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].kind, ModelKind::Face);
        assert_eq!(summary[1].kind, ModelKind::Background);
        assert_eq!(summary[1].image_count, 3);

        let rows = group_rows(results.get("ArcFace").unwrap());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cosine_label(), "87.50%");
        assert_eq!(rows[0].pearson_label(), "0.00%");
    }
}
