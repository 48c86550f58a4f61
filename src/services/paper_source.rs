//! 试卷来源 - 业务能力层
//!
//! 试卷分析流程的第一阶段只需要"拿到一段试卷文字"。文字可以来自上传文件
//! (调用后端提取)，也可以来自内置的演示试卷 (不发网络请求)。
//! 两种来源实现同一个 `PaperSource`，控制器不关心具体是哪一种。

use async_trait::async_trait;
use tracing::{debug, info};

use crate::clients::Gateway;
use crate::error::RemoteResult;
use crate::models::Artifact;
use crate::utils::logging::truncate_text;

/// 内置演示试卷 (数据结构与算法，8 题，满分 100)
pub const DEMO_PAPER: &str = r#"UNIVERSITY EXAMINATION — DATA STRUCTURES AND ALGORITHMS
Time: 3 Hours    Max Marks: 100

PART A — Short Answer (40 marks)
Q1. Define a binary search tree. State its properties.              [8 marks]
Q2. Compare BFS and DFS. Give time and space complexities.          [8 marks]
Q3. What is dynamic programming? List its key properties.           [8 marks]
Q4. Explain hashing and two collision resolution methods.           [8 marks]
Q5. What is a minimum spanning tree? Name two algorithms.           [8 marks]

PART B — Long Answer (60 marks)
Q6. Implement insertion and deletion in a BST. Trace an example.   [15 marks]
Q7. Write Dijkstra's shortest-path algorithm. Trace on a graph.    [20 marks]
Q8. Solve 0/1 Knapsack using DP. weights=[2,3,4,5], values=[3,4,5,6], W=5. [25 marks]"#;

/// 试卷文字来源
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// 用于日志的简短描述
    fn describe(&self) -> String;

    /// 读取试卷文字
    async fn read_text(&self, gateway: &dyn Gateway) -> RemoteResult<String>;
}

/// 用户上传的试卷文件
#[derive(Debug, Clone)]
pub struct UploadedPaper {
    artifact: Artifact,
}

impl UploadedPaper {
    pub fn new(artifact: Artifact) -> Self {
        Self { artifact }
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }
}

#[async_trait]
impl PaperSource for UploadedPaper {
    fn describe(&self) -> String {
        format!("上传文件 {}", self.artifact)
    }

    async fn read_text(&self, gateway: &dyn Gateway) -> RemoteResult<String> {
        let extracted = gateway.extract_paper_text(&self.artifact).await?;
        info!(
            "✓ 试卷文字提取完成: {} 字符 ({})",
            extracted.text.chars().count(),
            self.artifact.name()
        );
        debug!("试卷文字预览: {}", truncate_text(&extracted.text, 80));
        Ok(extracted.text)
    }
}

/// 内置演示试卷，固定文本，不访问后端
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoPaper;

#[async_trait]
impl PaperSource for DemoPaper {
    fn describe(&self) -> String {
        "内置演示试卷".to_string()
    }

    async fn read_text(&self, _gateway: &dyn Gateway) -> RemoteResult<String> {
        Ok(DEMO_PAPER.to_string())
    }
}
