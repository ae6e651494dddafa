//! Project store: board projects, linked projects and parallel tasks.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::raw::RawProjects;

/// A project whose issues appear on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardProject {
    pub code: String,
    pub colour: Option<String>,
    /// Whether this project's issues may be reranked from the board.
    pub can_rank: bool,
    /// Board column name -> this project's own state name. Only mapped
    /// columns receive this project's issues; the map's entry order defines
    /// the project's local state indices.
    pub board_state_to_own_state: IndexMap<String, String>,
}

/// A secondary, per-project workflow dimension with selectable options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelTask {
    pub name: String,
    pub display: String,
    pub options: Vec<String>,
}

/// All project configuration of one board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectState {
    /// The project whose state list defines the board columns.
    pub owner: String,
    pub board_projects: IndexMap<String, Arc<BoardProject>>,
    /// Linked project code -> its state names, used only to display the
    /// state of linked issues.
    pub linked_projects: IndexMap<String, Vec<String>>,
    pub parallel_tasks: IndexMap<String, Vec<Arc<ParallelTask>>>,
}

impl ProjectState {
    pub fn from_raw(raw: &RawProjects) -> Arc<Self> {
        let board_projects = raw
            .main
            .iter()
            .map(|(code, project)| {
                let board_state_to_own_state = project
                    .state_links
                    .iter()
                    .filter_map(|(board, own)| {
                        own.as_ref().map(|own| (board.clone(), own.clone()))
                    })
                    .collect();
                (
                    code.clone(),
                    Arc::new(BoardProject {
                        code: code.clone(),
                        colour: project.colour.clone(),
                        can_rank: project.rank,
                        board_state_to_own_state,
                    }),
                )
            })
            .collect();

        let linked_projects = raw
            .linked
            .iter()
            .map(|(code, linked)| (code.clone(), linked.states.clone()))
            .collect();

        let parallel_tasks = raw
            .main
            .iter()
            .filter(|(_, project)| !project.parallel_tasks.is_empty())
            .map(|(code, project)| {
                let tasks = project
                    .parallel_tasks
                    .iter()
                    .map(|task| {
                        Arc::new(ParallelTask {
                            name: task.name.clone(),
                            display: task.display.clone(),
                            options: task.options.clone(),
                        })
                    })
                    .collect();
                (code.clone(), tasks)
            })
            .collect();

        Arc::new(Self {
            owner: raw.owner.clone(),
            board_projects,
            linked_projects,
            parallel_tasks,
        })
    }

    /// The selected option string for position `task_index` / `option_index`
    /// of `project`'s parallel task configuration.
    pub fn parallel_task_option(
        &self,
        project: &str,
        task_index: usize,
        option_index: usize,
    ) -> Option<&str> {
        self.parallel_tasks
            .get(project)
            .and_then(|tasks| tasks.get(task_index))
            .and_then(|task| task.options.get(option_index))
            .map(String::as_str)
    }
}
