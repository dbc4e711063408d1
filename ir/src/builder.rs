use crate::{BasicBlock, BlockId, Function, Instruction, Terminator, VarId};

/// Incrementally builds one function. Blocks are kept in creation order,
/// which is also the order they are printed in.
pub struct FunctionBuilder {
    name: String,
    next_var: usize,
    blocks: Vec<BasicBlock>,
    current_block: Option<BlockId>,
}

impl FunctionBuilder {
    /// Start a function with an empty `entry` block selected
    pub fn new(name: impl Into<String>) -> Self {
        let mut builder = Self {
            name: name.into(),
            next_var: 0,
            blocks: Vec::new(),
            current_block: None,
        };
        let entry = builder.new_block("entry");
        builder.switch_to(entry);
        builder
    }

    pub fn new_var(&mut self) -> VarId {
        let id = self.next_var;
        self.next_var += 1;
        VarId(id)
    }

    pub fn new_block(&mut self, label: impl Into<String>) -> BlockId {
        let id = BlockId(self.blocks.len());
        self.blocks.push(BasicBlock {
            id,
            label: label.into(),
            instructions: Vec::new(),
            terminator: Terminator::Unreachable,
        });
        id
    }

    pub fn switch_to(&mut self, block: BlockId) {
        self.current_block = Some(block);
    }

    /// Append to the selected block. Callers must `switch_to` after every
    /// `terminate`.
    pub fn add_instruction(&mut self, instr: Instruction) {
        debug_assert!(self.current_block.is_some(), "instruction added with no block selected");
        if let Some(bid) = self.current_block {
            self.blocks[bid.0].instructions.push(instr);
        }
    }

    /// Close the current block. Nothing is selected afterwards until the
    /// next `switch_to`.
    pub fn terminate(&mut self, term: Terminator) {
        debug_assert!(self.current_block.is_some(), "terminator set with no block selected");
        if let Some(bid) = self.current_block.take() {
            self.blocks[bid.0].terminator = term;
        }
    }

    pub fn finish(self) -> Function {
        Function {
            name: self.name,
            blocks: self.blocks,
            entry_block: BlockId(0),
        }
    }
}
