/// One operation of the command-line tool. JSON arguments are kept as text and parsed
/// by the runner so every parse error surfaces the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Find {
        filter_json: String,
        sort_json: Option<String>,
        skip: Option<usize>,
        limit: Option<usize>,
    },
    Count {
        filter_json: String,
    },
    Aggregate {
        pipeline_json: String,
    },
    Update {
        filter_json: String,
        update_json: String,
        one: bool,
    },
    Delete {
        filter_json: String,
        one: bool,
    },
    /// Print every document, e.g. after loading.
    Dump,
}
