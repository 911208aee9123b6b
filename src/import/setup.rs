//! Install context setup
//!
//! Before any application object is created, the APEX installer package has
//! to know which workspace, application id, schema and alias to use. This is
//! done with one anonymous block and four positional binds.

use crate::config::ImportParameters;
use crate::database::{BindValue, ImportTransaction};
use crate::error::{ImportError, Result};

/// Anonymous block establishing the install context
///
/// Binds: `:1` application id, `:2` alias, `:3` schema, `:4` workspace.
pub const INSTALL_CONTEXT_BLOCK: &str = "declare
    l_workspace_id number;
    l_app_id       number;
    l_alias        varchar2(255);
    l_schema       varchar2(128);
    l_workspace    varchar2(255);
begin
    l_app_id    := :1;
    l_alias     := :2;
    l_schema    := :3;
    l_workspace := :4;

    select workspace_id into l_workspace_id
      from apex_workspaces
     where workspace = upper(nvl(l_workspace, user));

    apex_application_install.set_workspace_id(l_workspace_id);

    if l_app_id is not null then
        apex_application_install.set_application_id(l_app_id);
    else
        apex_application_install.generate_application_id;
    end if;

    apex_application_install.generate_offset;

    if l_schema is not null then
        apex_application_install.set_schema(l_schema);
    end if;

    if l_alias is not null then
        apex_application_install.set_application_alias(l_alias);
    end if;
end;";

/// Positional binds for [`INSTALL_CONTEXT_BLOCK`]
pub fn setup_binds(params: &ImportParameters) -> [BindValue; 4] {
    [
        BindValue::Integer(params.application_id),
        BindValue::Text(params.alias.clone()),
        BindValue::Text(params.schema.clone()),
        BindValue::Text(params.workspace.clone()),
    ]
}

/// Establish the install context on the open transaction
pub fn run_setup(params: &ImportParameters, tx: &mut dyn ImportTransaction) -> Result<()> {
    tracing::debug!(
        application_id = ?params.application_id,
        alias = ?params.alias,
        schema = ?params.schema,
        workspace = ?params.workspace,
        "Setting install context"
    );

    tx.execute_with_binds(INSTALL_CONTEXT_BLOCK, &setup_binds(params))
        .map_err(ImportError::SetupInvocation)
}
