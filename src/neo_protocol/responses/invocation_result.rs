use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
	neo_protocol::responses::VMState,
	neo_types::StackItem,
};

/// Result of `invokefunction` and `invokescript`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationResult {
	pub script: String,
	pub state: VMState,
	#[serde(rename = "gasconsumed")]
	pub gas_consumed: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub exception: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notifications: Option<Vec<Value>>,
	#[serde(default)]
	pub stack: Vec<StackItem>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tx: Option<String>,
}

impl InvocationResult {
	/// Whether the VM halted normally.
	pub fn is_halt(&self) -> bool {
		self.state == VMState::Halt
	}

	/// The first stack entry, where most read-only calls leave their result.
	pub fn first_stack_item(&self) -> Option<&StackItem> {
		self.stack.first()
	}
}
