//! 成绩计算
//!
//! 全部为纯函数，不访问数据库。分数先换算为 20 分制；
//! 单科平均由随堂测验均分、作业均分与期末考试按权重合成，
//! 总平均按科目系数加权。输出统一保留两位小数。

use std::collections::HashMap;

use crate::config::{GradingConfig, MentionThresholds};
use crate::models::grading::entities::{
    AnnualDecision, Evaluation, EvaluationKind, Grade, Mention, NewTrimesterResult, Subject,
    SubjectAverage,
};

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 换算为 20 分制
pub fn normalize(score: f64, max_score: f64) -> f64 {
    score / max_score * 20.0
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// 单科平均
///
/// `scores` 为该生在本科目本学期已换算的成绩，缺考不在其中。
pub fn subject_average(
    subject: &Subject,
    scores: &[(EvaluationKind, f64)],
    config: &GradingConfig,
) -> SubjectAverage {
    let of_kind = |kind: EvaluationKind| -> Vec<f64> {
        scores
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, s)| *s)
            .collect()
    };
    let interrogation = mean(&of_kind(EvaluationKind::Interrogation));
    let devoir = mean(&of_kind(EvaluationKind::Devoir));
    let composition = mean(&of_kind(EvaluationKind::Composition));

    let components = [
        (interrogation, config.interrogation_weight),
        (devoir, config.devoir_weight),
        (composition, config.composition_weight),
    ];
    let (weighted, weights) = components
        .iter()
        .filter_map(|(value, weight)| value.map(|v| (v * weight, *weight)))
        .fold((0.0, 0.0), |(sum, total), (v, w)| (sum + v, total + w));

    let average = (weights > 0.0).then(|| round2(weighted / weights));

    SubjectAverage {
        subject_id: subject.id,
        subject_name: subject.name.clone(),
        coefficient: subject.coefficient,
        interrogation_average: interrogation.map(round2),
        devoir_average: devoir.map(round2),
        composition: composition.map(round2),
        average,
        points: average.map(|avg| round2(avg * subject.coefficient as f64)),
    }
}

/// 系数加权总平均，只计入有平均分的科目
pub fn general_average(subjects: &[SubjectAverage]) -> Option<f64> {
    let (points, coefficients) = subjects
        .iter()
        .filter_map(|s| s.average.map(|avg| (avg * s.coefficient as f64, s.coefficient)))
        .fold((0.0, 0), |(p, c), (points, coef)| (p + points, c + coef));

    (coefficients > 0).then(|| round2(points / coefficients as f64))
}

/// 竞赛式排名：并列同名次，下一名次跳过（1, 2, 2, 4）
///
/// 返回值与输入一一对应，没有平均分的学生不参与排名。
pub fn competition_ranks(averages: &[Option<f64>]) -> Vec<Option<i32>> {
    // 以百分之一为单位比较，避免浮点误差
    let keys: Vec<Option<i64>> = averages
        .iter()
        .map(|avg| avg.map(|v| (v * 100.0).round() as i64))
        .collect();

    keys.iter()
        .map(|key| {
            key.map(|value| {
                let better = keys.iter().flatten().filter(|other| **other > value).count();
                better as i32 + 1
            })
        })
        .collect()
}

pub fn mention_for(average: f64, thresholds: &MentionThresholds) -> Mention {
    if average >= thresholds.excellent {
        Mention::Excellent
    } else if average >= thresholds.very_good {
        Mention::VeryGood
    } else if average >= thresholds.good {
        Mention::Good
    } else if average >= thresholds.fair {
        Mention::Fair
    } else if average >= thresholds.warning {
        Mention::Warning
    } else {
        Mention::Insufficient
    }
}

/// 年度平均：各学期总平均的算术平均
pub fn annual_average(trimester_averages: &[Option<f64>]) -> Option<f64> {
    let values: Vec<f64> = trimester_averages.iter().flatten().copied().collect();
    mean(&values).map(round2)
}

pub fn annual_decision(average: f64, config: &GradingConfig) -> AnnualDecision {
    if average >= config.pass_threshold {
        AnnualDecision::Promoted
    } else if average >= config.repeat_threshold {
        AnnualDecision::Repeat
    } else {
        AnnualDecision::Dismissed
    }
}

/// 计算一个班级在一个学期的全部结果
///
/// `evaluations` 应只包含本班本学期的评估，`grades` 为这些评估的成绩。
pub fn build_trimester_results(
    student_ids: &[i64],
    subjects: &[Subject],
    evaluations: &[Evaluation],
    grades: &[Grade],
    config: &GradingConfig,
) -> Vec<NewTrimesterResult> {
    let evaluation_by_id: HashMap<i64, &Evaluation> =
        evaluations.iter().map(|e| (e.id, e)).collect();

    // (student, subject) -> 已换算成绩
    let mut scores: HashMap<(i64, i64), Vec<(EvaluationKind, f64)>> = HashMap::new();
    for grade in grades {
        let (Some(score), Some(evaluation)) =
            (grade.score, evaluation_by_id.get(&grade.evaluation_id))
        else {
            continue;
        };
        scores
            .entry((grade.student_id, evaluation.subject_id))
            .or_default()
            .push((evaluation.kind, normalize(score, evaluation.max_score)));
    }

    let per_student: Vec<(i64, Vec<SubjectAverage>, Option<f64>)> = student_ids
        .iter()
        .map(|student_id| {
            let lines: Vec<SubjectAverage> = subjects
                .iter()
                .map(|subject| {
                    let student_scores = scores
                        .get(&(*student_id, subject.id))
                        .map(Vec::as_slice)
                        .unwrap_or(&[]);
                    subject_average(subject, student_scores, config)
                })
                .collect();
            let average = general_average(&lines);
            (*student_id, lines, average)
        })
        .collect();

    let averages: Vec<Option<f64>> = per_student.iter().map(|(_, _, avg)| *avg).collect();
    let ranks = competition_ranks(&averages);

    per_student
        .into_iter()
        .zip(ranks)
        .map(|((student_id, subjects, average), rank)| NewTrimesterResult {
            student_id,
            average,
            rank,
            mention: average.map(|avg| mention_for(avg, &config.mentions)),
            subjects,
        })
        .collect()
}

/// 班级平均：有总平均的学生的算术平均
pub fn class_average(averages: &[Option<f64>]) -> Option<f64> {
    let values: Vec<f64> = averages.iter().flatten().copied().collect();
    mean(&values).map(round2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GradingConfig {
        GradingConfig {
            interrogation_weight: 1.0,
            devoir_weight: 1.0,
            composition_weight: 2.0,
            pass_threshold: 10.0,
            repeat_threshold: 7.0,
            mentions: MentionThresholds {
                excellent: 16.0,
                very_good: 14.0,
                good: 12.0,
                fair: 10.0,
                warning: 8.0,
            },
        }
    }

    fn subject(id: i64, coefficient: i32) -> Subject {
        Subject {
            id,
            class_id: 1,
            name: format!("Subject {id}"),
            coefficient,
            teacher_id: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn evaluation(id: i64, subject_id: i64, kind: EvaluationKind, max_score: f64) -> Evaluation {
        Evaluation {
            id,
            subject_id,
            trimester_id: 1,
            kind,
            title: format!("Eval {id}"),
            evaluation_date: None,
            max_score,
            created_by: 1,
            created_at: chrono::Utc::now(),
        }
    }

    fn grade(evaluation_id: i64, student_id: i64, score: Option<f64>) -> Grade {
        Grade {
            id: evaluation_id * 100 + student_id,
            evaluation_id,
            student_id,
            score,
            recorded_by: 1,
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(5.0, 10.0), 10.0);
        assert_eq!(normalize(15.0, 20.0), 15.0);
        assert_eq!(normalize(40.0, 40.0), 20.0);
    }

    #[test]
    fn test_subject_average_weights_composition_double() {
        use EvaluationKind::*;
        let scores = [
            (Interrogation, 12.0),
            (Interrogation, 14.0),
            (Devoir, 10.0),
            (Composition, 15.0),
        ];
        let line = subject_average(&subject(1, 3), &scores, &config());
        assert_eq!(line.interrogation_average, Some(13.0));
        assert_eq!(line.devoir_average, Some(10.0));
        assert_eq!(line.composition, Some(15.0));
        // (13 + 10 + 2 * 15) / 4
        assert_eq!(line.average, Some(13.25));
        assert_eq!(line.points, Some(39.75));
    }

    #[test]
    fn test_subject_average_uses_existing_components_only() {
        let line = subject_average(
            &subject(1, 2),
            &[(EvaluationKind::Devoir, 11.0)],
            &config(),
        );
        assert_eq!(line.average, Some(11.0));
        assert_eq!(line.composition, None);

        let empty = subject_average(&subject(1, 2), &[], &config());
        assert_eq!(empty.average, None);
        assert_eq!(empty.points, None);
    }

    #[test]
    fn test_general_average_skips_subjects_without_average() {
        let cfg = config();
        let lines = vec![
            subject_average(&subject(1, 4), &[(EvaluationKind::Composition, 12.0)], &cfg),
            subject_average(&subject(2, 2), &[(EvaluationKind::Composition, 15.0)], &cfg),
            subject_average(&subject(3, 5), &[], &cfg),
        ];
        // (12 * 4 + 15 * 2) / 6
        assert_eq!(general_average(&lines), Some(13.0));
        assert_eq!(general_average(&lines[2..]), None);
    }

    #[test]
    fn test_competition_ranks_with_ties() {
        let ranks = competition_ranks(&[Some(15.0), Some(12.5), Some(12.5), Some(9.0), None]);
        assert_eq!(ranks, vec![Some(1), Some(2), Some(2), Some(4), None]);
    }

    #[test]
    fn test_competition_ranks_compare_rounded_values() {
        let ranks = competition_ranks(&[Some(12.004), Some(11.996), Some(13.0)]);
        assert_eq!(ranks, vec![Some(2), Some(2), Some(1)]);
    }

    #[test]
    fn test_mention_boundaries() {
        let t = config().mentions;
        assert_eq!(mention_for(16.0, &t), Mention::Excellent);
        assert_eq!(mention_for(15.99, &t), Mention::VeryGood);
        assert_eq!(mention_for(12.0, &t), Mention::Good);
        assert_eq!(mention_for(10.0, &t), Mention::Fair);
        assert_eq!(mention_for(8.0, &t), Mention::Warning);
        assert_eq!(mention_for(7.99, &t), Mention::Insufficient);
    }

    #[test]
    fn test_annual_average_and_decision() {
        let cfg = config();
        assert_eq!(annual_average(&[Some(9.0), Some(11.0), Some(13.0)]), Some(11.0));
        assert_eq!(annual_average(&[Some(9.5), None]), Some(9.5));
        assert_eq!(annual_average(&[None, None]), None);

        assert_eq!(annual_decision(10.0, &cfg), AnnualDecision::Promoted);
        assert_eq!(annual_decision(7.0, &cfg), AnnualDecision::Repeat);
        assert_eq!(annual_decision(6.99, &cfg), AnnualDecision::Dismissed);
    }

    #[test]
    fn test_build_trimester_results() {
        use EvaluationKind::*;
        let cfg = config();
        let subjects = vec![subject(1, 2), subject(2, 1)];
        let evaluations = vec![
            evaluation(10, 1, Interrogation, 10.0),
            evaluation(11, 1, Composition, 20.0),
            evaluation(20, 2, Composition, 40.0),
        ];
        let grades = vec![
            grade(10, 1, Some(8.0)),  // 16/20
            grade(11, 1, Some(13.0)), // 13
            grade(20, 1, Some(28.0)), // 14
            grade(10, 2, None),       // 缺考
            grade(11, 2, Some(10.0)),
            grade(20, 2, Some(20.0)), // 10
        ];

        let results = build_trimester_results(&[1, 2, 3], &subjects, &evaluations, &grades, &cfg);
        assert_eq!(results.len(), 3);

        // 学生 1：科目一 (16 + 2 * 13) / 3 = 14，科目二 14
        let first = &results[0];
        assert_eq!(first.subjects[0].average, Some(14.0));
        assert_eq!(first.subjects[1].average, Some(14.0));
        assert_eq!(first.average, Some(14.0));
        assert_eq!(first.rank, Some(1));
        assert_eq!(first.mention, Some(Mention::VeryGood));

        // 学生 2：缺考不计入，科目一只有期末 10
        let second = &results[1];
        assert_eq!(second.subjects[0].interrogation_average, None);
        assert_eq!(second.average, Some(10.0));
        assert_eq!(second.rank, Some(2));
        assert_eq!(second.mention, Some(Mention::Fair));

        // 学生 3 没有任何成绩
        let third = &results[2];
        assert_eq!(third.average, None);
        assert_eq!(third.rank, None);
        assert_eq!(third.mention, None);
    }

    #[test]
    fn test_class_average() {
        assert_eq!(class_average(&[Some(10.0), Some(13.0), None]), Some(11.5));
        assert_eq!(class_average(&[]), None);
    }
}
