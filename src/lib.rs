//! # danci-progress - 学习进度与推荐核心库
//!
//! 本 crate 把练习记录快照转换为课程进度和学习建议:
//!
//! - **Accuracy Aggregation** - 按类别 / 拼写模式 / 词源 / 主题汇总正确率
//! - **Curriculum Evaluation** - 掌握度门槛驱动的阶段解锁与当前阶段指针
//! - **Recommendations** - 学习计划、教练卡片与难度提升建议
//!
//! ## 设计理念
//!
//! - **纯函数** - 只读取不可变快照，不做 I/O，不修改输入
//! - **确定性** - 所有分组使用有序映射，相同输入得到相同输出
//! - **不会失败** - 异常计数被截断而不是向上传播，除零结果为 0
//!
//! ## 模块结构
//!
//! - [`aggregate`] - 正确率汇总、错误模式、最难单词
//! - [`curriculum`] - 课程阶段表与阶段评估、按层级分组
//! - [`recommend`] - 学习计划、教练卡片、难度提示
//! - [`engine`] - 组合以上模块并缓存最近一次结果
//! - [`sanitize`] - 计数截断与安全除法
//! - [`config`] - 推荐阈值配置
//! - [`types`] - 公共类型和常量
//!
//! ## 使用示例
//!
//! ```rust
//! use danci_progress::{EngineConfig, ExternalSignals, PracticeRecord, ProgressEngine, Snapshot};
//!
//! let mut records = Snapshot::new();
//! records.insert("cake".to_string(), PracticeRecord::new("silent-e", 10, 6, 2));
//!
//! let engine = ProgressEngine::new(EngineConfig::default()).unwrap();
//! let report = engine.evaluate(&records, ExternalSignals { review_due_count: 3, weak_item_count: 0 });
//!
//! assert_eq!(report.curriculum.current_phase_index, 0);
//! assert_eq!(report.primary_action().map(|p| p.priority.as_str()), Some("review"));
//! ```

// ============================================================================
// 模块声明
// ============================================================================

pub mod aggregate;
pub mod config;
pub mod curriculum;
pub mod engine;
pub mod error;
pub mod logging;
pub mod recommend;
pub mod sanitize;
pub mod types;

// ============================================================================
// 重新导出
// ============================================================================

/// 重新导出所有公共类型
pub use types::*;

pub use config::EngineConfig;
pub use engine::{ProgressEngine, ProgressReport};
pub use error::{ConfigError, CurriculumError, Error, Result};

/// 重新导出汇总函数
pub use aggregate::{category_accuracy, dimension_accuracy, error_patterns, hardest_item_count, hardest_items};

/// 重新导出课程评估
pub use curriculum::{evaluate_curriculum, group_by_tier, validate_phases, CURRICULUM};

/// 重新导出推荐逻辑
pub use recommend::{build_study_plan, coaching_cards, difficulty_nudge, primary_action};
