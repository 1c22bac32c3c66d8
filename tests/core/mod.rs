mod before_emit;
