use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::get_required_str;
use crate::ipc::types::{AppState, Request};
use serde_json::{json, Value};

fn handle_login(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let username = get_required_str(&req.params, "username")?;
    let password = req
        .params
        .get("password")
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::bad_params("missing password"))?;

    let user = state
        .session
        .login(&username, password)
        .map_err(|e| HandlerErr::new("write_failed", format!("{e:#}")))?
        .ok_or_else(|| HandlerErr::new("bad_credentials", "Usuario o contraseña incorrectos"))?;
    tracing::info!(username = %user.username, role = ?user.role, "user logged in");
    Ok(json!({
        "user": user,
        "dashboard": user.role.dashboard(),
    }))
}

fn handle_current(state: &mut AppState, _req: &Request) -> Result<Value, HandlerErr> {
    Ok(json!({
        "user": state.session.current(),
        "dashboard": state.session.current().map(|u| u.role.dashboard()),
    }))
}

fn handle_logout(state: &mut AppState, _req: &Request) -> Result<Value, HandlerErr> {
    let logged_out = state
        .session
        .clear()
        .map_err(|e| HandlerErr::new("write_failed", format!("{e:#}")))?;
    Ok(json!({ "loggedOut": logged_out }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let result = match req.method.as_str() {
        "session.login" => handle_login(state, req),
        "session.current" => handle_current(state, req),
        "session.logout" => handle_logout(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
