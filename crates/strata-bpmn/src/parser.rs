use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use strata_config::{ElementDef, ElementType, FlowDef, GatewayKind, MessageFlowDef, ProcessDef};
use strata_process::ActorTag;
use tracing::debug;

use crate::error::BpmnError;

/// Elements the engine has no execution semantics for.
const UNSUPPORTED: &[&str] = &[
  "subProcess",
  "adHocSubProcess",
  "transaction",
  "boundaryEvent",
  "intermediateCatchEvent",
  "intermediateThrowEvent",
  "eventBasedGateway",
  "complexGateway",
];

#[derive(Debug, Default)]
struct ProcessBuilder {
  id: String,
  name: Option<String>,
  executable: bool,
  elements: Vec<ElementDef>,
  /// BPMN element name per element, used for actor defaults.
  kinds: HashMap<String, String>,
  flows: Vec<FlowDef>,
  /// gateway id -> default flow id
  defaults: HashMap<String, String>,
  /// node id -> lane name
  lanes: HashMap<String, String>,
}

#[derive(Debug)]
struct Participant {
  id: String,
  name: String,
  process_ref: Option<String>,
}

#[derive(Debug, Default)]
struct Document {
  processes: Vec<ProcessBuilder>,
  participants: Vec<Participant>,
  message_flows: Vec<MessageFlowDef>,
}

/// Parser state while walking the event stream.
#[derive(Debug, Default)]
struct Parser {
  doc: Document,
  current: Option<ProcessBuilder>,
  /// Open element names, outermost first.
  stack: Vec<String>,
  /// Open lane names, innermost last.
  lanes: Vec<String>,
  /// Index of the sequence flow whose body is being read.
  open_flow: Option<usize>,
}

/// Parse every process in a BPMN 2.0 XML document.
pub fn parse_bpmn(source: &str) -> Result<Vec<ProcessDef>, BpmnError> {
  let mut reader = Reader::from_str(source);
  reader.config_mut().trim_text(true);

  let mut parser = Parser::default();
  loop {
    match reader.read_event()? {
      Event::Start(e) => {
        let tag = local_name(&e);
        parser.open(&e, &tag, false)?;
        parser.stack.push(tag);
      }
      Event::Empty(e) => {
        let tag = local_name(&e);
        parser.open(&e, &tag, true)?;
      }
      Event::End(e) => {
        let tag = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        parser.close(&tag);
      }
      Event::Text(t) => {
        let text = t.unescape()?;
        parser.text(&text);
      }
      Event::CData(c) => {
        let raw = c.into_inner();
        parser.text(&String::from_utf8_lossy(&raw));
      }
      Event::Eof => break,
      _ => {}
    }
  }

  if parser.doc.processes.is_empty() {
    return Err(BpmnError::NoProcesses);
  }

  Ok(parser.doc.finish())
}

fn local_name(e: &BytesStart<'_>) -> String {
  String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attributes(e: &BytesStart<'_>) -> Result<HashMap<String, String>, BpmnError> {
  let mut attrs = HashMap::new();
  for attr in e.attributes() {
    let attr = attr.map_err(quick_xml::Error::from)?;
    let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
    let value = attr.unescape_value()?.into_owned();
    attrs.insert(key, value);
  }
  Ok(attrs)
}

fn required(
  attrs: &HashMap<String, String>,
  element: &str,
  attribute: &'static str,
) -> Result<String, BpmnError> {
  attrs
    .get(attribute)
    .cloned()
    .ok_or_else(|| BpmnError::MissingAttribute {
      element: element.to_string(),
      attribute,
    })
}

impl Parser {
  fn open(&mut self, e: &BytesStart<'_>, tag: &str, empty: bool) -> Result<(), BpmnError> {
    let parent = self.stack.last().map(String::as_str);

    match (parent, tag) {
      (_, "process") => {
        let attrs = attributes(e)?;
        let process = ProcessBuilder {
          id: required(&attrs, tag, "id")?,
          name: attrs.get("name").cloned(),
          executable: attrs.get("isExecutable").is_none_or(|v| v != "false"),
          ..Default::default()
        };
        if empty {
          self.doc.processes.push(process);
        } else {
          self.current = Some(process);
        }
      }
      (Some("collaboration"), "participant") => {
        let attrs = attributes(e)?;
        let id = required(&attrs, tag, "id")?;
        self.doc.participants.push(Participant {
          name: attrs.get("name").cloned().unwrap_or_else(|| id.clone()),
          id,
          process_ref: attrs.get("processRef").cloned(),
        });
      }
      (Some("collaboration"), "messageFlow") => {
        let attrs = attributes(e)?;
        self.doc.message_flows.push(MessageFlowDef {
          id: required(&attrs, tag, "id")?,
          from: required(&attrs, tag, "sourceRef")?,
          to: required(&attrs, tag, "targetRef")?,
          label: attrs.get("name").cloned(),
        });
      }
      (_, "lane") => {
        if !empty {
          let attrs = attributes(e)?;
          self.lanes.push(attrs.get("name").cloned().unwrap_or_default());
        }
      }
      (Some("process"), _) => {
        let Some(process) = self.current.as_mut() else {
          return Ok(());
        };
        let attrs = attributes(e)?;

        if UNSUPPORTED.contains(&tag) {
          return Err(BpmnError::Unsupported {
            element: tag.to_string(),
            id: attrs.get("id").cloned().unwrap_or_default(),
          });
        }

        if tag == "sequenceFlow" {
          process.flows.push(FlowDef {
            id: required(&attrs, tag, "id")?,
            from: required(&attrs, tag, "sourceRef")?,
            to: required(&attrs, tag, "targetRef")?,
            condition: None,
          });
          if !empty {
            self.open_flow = Some(process.flows.len() - 1);
          }
          return Ok(());
        }

        let Some(element_type) = element_type(tag, &attrs)? else {
          return Ok(());
        };
        let id = required(&attrs, tag, "id")?;
        if let ElementType::Gateway { .. } = element_type
          && let Some(default) = attrs.get("default")
        {
          process.defaults.insert(id.clone(), default.clone());
        }
        process.kinds.insert(id.clone(), tag.to_string());
        process.elements.push(ElementDef {
          name: attrs.get("name").cloned(),
          join: attrs.get("gatewayDirection").is_some_and(|d| d == "Converging"),
          id,
          element_type,
        });
      }
      _ => {}
    }

    Ok(())
  }

  fn close(&mut self, tag: &str) {
    self.stack.pop();
    match tag {
      "process" => {
        if let Some(process) = self.current.take() {
          self.doc.processes.push(process);
        }
      }
      "lane" => {
        self.lanes.pop();
      }
      "sequenceFlow" => self.open_flow = None,
      _ => {}
    }
  }

  fn text(&mut self, text: &str) {
    let Some(process) = self.current.as_mut() else {
      return;
    };
    match self.stack.last().map(String::as_str) {
      Some("conditionExpression") => {
        if let Some(flow) = self.open_flow.and_then(|i| process.flows.get_mut(i)) {
          flow
            .condition
            .get_or_insert_with(String::new)
            .push_str(text.trim());
        }
      }
      Some("flowNodeRef") => {
        if let Some(lane) = self.lanes.last() {
          process.lanes.insert(text.trim().to_string(), lane.clone());
        }
      }
      _ => {}
    }
  }
}

fn element_type(
  tag: &str,
  attrs: &HashMap<String, String>,
) -> Result<Option<ElementType>, BpmnError> {
  let actor = attrs.get("actor").cloned();
  let element_type = match tag {
    "startEvent" => ElementType::Start,
    "endEvent" => ElementType::End,
    "task" | "userTask" | "manualTask" | "scriptTask" | "serviceTask" | "businessRuleTask"
    | "sendTask" | "receiveTask" => ElementType::Task {
      actor,
      // "##WebService" and friends are BPMN defaults, not handler names.
      handler: attrs
        .get("implementation")
        .filter(|i| !i.starts_with("##"))
        .cloned(),
    },
    "callActivity" => ElementType::CallActivity {
      actor,
      called_element: required(attrs, tag, "calledElement")?,
    },
    "exclusiveGateway" => ElementType::Gateway {
      gateway: GatewayKind::Exclusive,
    },
    "inclusiveGateway" => ElementType::Gateway {
      gateway: GatewayKind::Inclusive,
    },
    "parallelGateway" => ElementType::Gateway {
      gateway: GatewayKind::Parallel,
    },
    _ => return Ok(None),
  };
  Ok(Some(element_type))
}

/// Actor for a task that names none: its lane when the lane is an actor,
/// otherwise a default by BPMN element.
fn default_actor(kind: &str) -> ActorTag {
  match kind {
    "userTask" | "manualTask" => ActorTag::DecisionMaker,
    "serviceTask" | "businessRuleTask" | "sendTask" | "receiveTask" => ActorTag::StateStore,
    "callActivity" => ActorTag::NestedProcess,
    _ => ActorTag::AutomationHook,
  }
}

impl ProcessBuilder {
  fn finish(mut self, pools: Vec<String>, message_flows: Vec<MessageFlowDef>) -> ProcessDef {
    for flow in &mut self.flows {
      if self.defaults.get(&flow.from) == Some(&flow.id) {
        flow.condition = None;
      }
    }

    for element in &mut self.elements {
      let actor = match &mut element.element_type {
        ElementType::Task { actor, .. } | ElementType::CallActivity { actor, .. } => actor,
        _ => continue,
      };
      if actor.is_some() {
        continue;
      }
      let from_lane = self
        .lanes
        .get(&element.id)
        .and_then(|lane| ActorTag::from_label(lane));
      let kind = self.kinds.get(&element.id).map(String::as_str).unwrap_or("task");
      let tag = from_lane.unwrap_or_else(|| default_actor(kind));
      *actor = Some(tag.as_str().to_string());
    }

    debug!(
      process_id = %self.id,
      elements = self.elements.len(),
      flows = self.flows.len(),
      "bpmn_process_parsed"
    );

    ProcessDef {
      process_id: self.id,
      name: self.name,
      executable: self.executable,
      pools,
      elements: self.elements,
      flows: self.flows,
      message_flows,
    }
  }
}

impl Document {
  /// Pool name for a message flow endpoint, which may name a participant or
  /// a node inside a participant's process.
  fn pool_of(&self, reference: &str) -> String {
    if let Some(p) = self.participants.iter().find(|p| p.id == reference) {
      return p.name.clone();
    }
    let owner = self
      .processes
      .iter()
      .find(|process| process.elements.iter().any(|e| e.id == reference));
    owner
      .and_then(|process| {
        self
          .participants
          .iter()
          .find(|p| p.process_ref.as_deref() == Some(process.id.as_str()))
      })
      .map(|p| p.name.clone())
      .unwrap_or_else(|| reference.to_string())
  }

  fn finish(self) -> Vec<ProcessDef> {
    let message_flows: Vec<MessageFlowDef> = self
      .message_flows
      .iter()
      .map(|m| MessageFlowDef {
        id: m.id.clone(),
        from: self.pool_of(&m.from),
        to: self.pool_of(&m.to),
        label: m.label.clone(),
      })
      .collect();

    let mut pools_by_process: HashMap<String, Vec<String>> = HashMap::new();
    for participant in &self.participants {
      if let Some(process_ref) = &participant.process_ref {
        pools_by_process
          .entry(process_ref.clone())
          .or_default()
          .push(participant.name.clone());
      }
    }

    self
      .processes
      .into_iter()
      .map(|process| {
        let pools = pools_by_process.remove(&process.id).unwrap_or_default();
        let attached = message_flows
          .iter()
          .filter(|m| pools.contains(&m.from) || pools.contains(&m.to))
          .cloned()
          .collect();
        process.finish(pools, attached)
      })
      .collect()
  }
}
