use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::registry;
use serde_json::{json, Value};

fn handle_classrooms_list(_state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let grade = match req.params.get("grade") {
        None | Some(Value::Null) => None,
        Some(v) => {
            let g = v
                .as_u64()
                .filter(|g| (1..=5).contains(g))
                .ok_or_else(|| HandlerErr::bad_params("grade must be an integer from 1 to 5"))?;
            Some(g as u8)
        }
    };
    let classrooms = match grade {
        Some(g) => registry::by_grade(g).collect::<Vec<_>>(),
        None => registry::all().iter().collect::<Vec<_>>(),
    };
    Ok(json!({ "classrooms": classrooms }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "classrooms.list" => Some(respond(&req.id, handle_classrooms_list(state, req))),
        _ => None,
    }
}
